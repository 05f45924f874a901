use std::{collections::HashSet, sync::Arc};

use tracing::{trace, warn};

use crate::{
    decl::Package, reference::NamedType, Error, FieldDescription, Frontend, PackageCache, Result,
    TypeDescription,
};

/// Knobs for a [`Resolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    tag_key: String,
    max_depth: usize,
    skip_foreign_embeddings: bool,
}

impl Options {
    /// The default options: `json` tags, a depth of 64 and no skipping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the struct tag key field names are read from.
    pub fn with_tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Sets how many types deep a resolution may go before it is considered a cycle.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Whether embedded types of packages outside the module are skipped instead of failing
    /// the resolution.
    pub fn with_skip_foreign_embeddings(mut self, skip: bool) -> Self {
        self.skip_foreign_embeddings = skip;
        self
    }

    /// The struct tag key.
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// The maximum resolution depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether foreign embedded types are skipped.
    pub fn skip_foreign_embeddings(&self) -> bool {
        self.skip_foreign_embeddings
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tag_key: "json".to_string(),
            max_depth: 64,
            skip_foreign_embeddings: false,
        }
    }
}

/// Resolves struct types into flattened descriptions.
#[derive(Debug)]
pub struct Resolver<'c, F> {
    cache: &'c PackageCache<F>,
    options: Options,
}

impl<'c, F> Resolver<'c, F>
where
    F: Frontend,
{
    /// Creates a resolver loading packages through `cache`, with default [`Options`].
    pub fn new(cache: &'c PackageCache<F>) -> Self {
        Self {
            cache,
            options: Options::default(),
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Describes the struct `name` declared in `package`, followed by every struct it depends
    /// on.
    ///
    /// Dependents come in the order they are first reached, and appear as many times as they
    /// are reached. A type that does not exist (or is not a struct) gives an empty list.
    pub fn resolve(&self, package: &str, name: &str) -> Result<Vec<TypeDescription>> {
        let mut walk = Walk {
            cache: self.cache,
            options: &self.options,
            stack: Vec::new(),
        };

        walk.resolve(package, name)
    }

    /// Like [`Resolver::resolve`] but every (package, name) pair is kept only the first time
    /// it appears.
    pub fn resolve_unique(&self, package: &str, name: &str) -> Result<Vec<TypeDescription>> {
        let mut seen = HashSet::new();
        let mut types = self.resolve(package, name)?;
        types.retain(|ty| seen.insert((ty.package().to_string(), ty.name().to_string())));

        Ok(types)
    }
}

/// The state of one resolution: the chain of types currently being resolved.
pub(crate) struct Walk<'r, F> {
    cache: &'r PackageCache<F>,
    pub(crate) options: &'r Options,
    stack: Vec<Frame>,
}

#[derive(Debug, PartialEq, Eq)]
struct Frame {
    package: String,
    name: String,
    // Entered to promote its fields into the frame below.
    embedded: bool,
}

impl<F> Walk<'_, F>
where
    F: Frontend,
{
    pub(crate) fn resolve(&mut self, package: &str, name: &str) -> Result<Vec<TypeDescription>> {
        let loaded = self.enter(package, name, false)?;
        let result = self.resolve_in(&loaded, name);
        self.stack.pop();

        result
    }

    /// Resolves `ty` for its fields to be promoted into the type on top of the chain.
    pub(crate) fn resolve_embedded(&mut self, ty: &NamedType) -> Result<Vec<TypeDescription>> {
        let loaded = self.enter(ty.package(), ty.name(), true)?;
        let result = self.resolve_in(&loaded, ty.name());
        self.stack.pop();

        result
    }

    /// The fields of `ty` alone, without resolving the types they refer to.
    ///
    /// Gives `None` if `ty` is not a struct.
    pub(crate) fn promote(&mut self, ty: &NamedType) -> Result<Option<Vec<FieldDescription>>> {
        let loaded = self.enter(ty.package(), ty.name(), true)?;
        let result = match loaded.structs(ty.name()).next() {
            Some((file, st)) => self
                .flatten(file, st, ty.name(), loaded.path())
                .map(|flat| Some(flat.fields)),
            None => Ok(None),
        };
        self.stack.pop();

        result
    }

    fn enter(&mut self, package: &str, name: &str, embedded: bool) -> Result<Arc<Package>> {
        if self.stack.len() >= self.options.max_depth {
            return Err(Error::CycleDetected(self.chain(package, name)));
        }

        let loaded = self.cache.load(package)?;
        self.stack.push(Frame {
            package: package.to_string(),
            name: name.to_string(),
            embedded,
        });
        trace!("resolving {} (depth {})", qualified(package, name), self.stack.len());

        Ok(loaded)
    }

    fn resolve_in(&mut self, package: &Package, name: &str) -> Result<Vec<TypeDescription>> {
        let mut types = Vec::new();
        for (file, st) in package.structs(name) {
            let flat = self.flatten(file, st, name, package.path())?;
            types.push(TypeDescription::new(package.path(), name, flat.fields));
            types.extend(flat.dependents);
            self.follow(file, st, package.path(), &mut types)?;
        }

        Ok(types)
    }

    /// Whether `ty` is being resolved further up the current chain.
    pub(crate) fn is_active(&self, ty: &NamedType) -> bool {
        self.stack
            .iter()
            .any(|frame| frame.package == ty.package() && frame.name == ty.name())
    }

    /// Whether embedding `ty` in the type on top of the chain closes a loop made of
    /// embeddings only, i.e. `ty` is active and every type entered since was embedded.
    pub(crate) fn embeds_itself(&self, ty: &NamedType) -> bool {
        let Some(at) = self
            .stack
            .iter()
            .rposition(|frame| frame.package == ty.package() && frame.name == ty.name())
        else {
            return false;
        };

        self.stack[at + 1..].iter().all(|frame| frame.embedded)
    }

    /// The current chain followed by `package.name`.
    pub(crate) fn chain(&self, package: &str, name: &str) -> Vec<String> {
        self.stack
            .iter()
            .map(|frame| qualified(&frame.package, &frame.name))
            .chain(core::iter::once(qualified(package, name)))
            .collect()
    }

    /// Resolves a field type that is not embedded, unless it is already being resolved.
    pub(crate) fn resolve_dependent(
        &mut self,
        ty: &NamedType,
        types: &mut Vec<TypeDescription>,
    ) -> Result<()> {
        if self.is_active(ty) {
            warn!(
                "{} refers back to itself, not expanding it again",
                qualified(ty.package(), ty.name())
            );
            return Ok(());
        }
        types.extend(self.resolve(ty.package(), ty.name())?);

        Ok(())
    }
}

fn qualified(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}
