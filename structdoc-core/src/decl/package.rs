//! Packages as seen by the resolver: sorted files, each with its own import table.

use std::collections::BTreeMap;

use super::{Import, SourceFile, StructType};

/// The module path (the `module` line of `go.mod`), used to map import paths to package
/// paths relative to the source root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRoot(String);

impl ModuleRoot {
    /// Creates a module root. Trailing slashes are ignored.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self(path.trim_end_matches('/').to_string())
    }

    /// The module path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Where an import path points to.
    ///
    /// With an empty module root every import is taken to be a path relative to the source
    /// root.
    pub fn target(&self, import_path: &str) -> ImportTarget {
        if self.0.is_empty() {
            return ImportTarget::Local(import_path.to_string());
        }
        if import_path == self.0 {
            return ImportTarget::Local(String::new());
        }

        match import_path
            .strip_prefix(self.0.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        {
            Some(local) => ImportTarget::Local(local.to_string()),
            None => ImportTarget::External(import_path.to_string()),
        }
    }
}

/// What an import alias resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// A package of the module, by its path relative to the source root.
    Local(String),
    /// A package outside the module (standard library or third party).
    External(String),
}

/// Per-file mapping from the local name of an import to its target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportAliasTable {
    entries: BTreeMap<String, ImportTarget>,
}

impl ImportAliasTable {
    /// Builds the table of a file's imports.
    ///
    /// Blank (`_`) and dot (`.`) imports introduce no qualifier and are left out.
    pub fn new(imports: &[Import], root: &ModuleRoot) -> Self {
        let mut entries = BTreeMap::new();
        for import in imports {
            let alias = match import.alias() {
                Some("_") | Some(".") => continue,
                Some(alias) => alias.to_string(),
                None => assumed_name(import.path()).to_string(),
            };
            entries.insert(alias, root.target(import.path()));
        }

        Self { entries }
    }

    /// Looks up a qualifier.
    pub fn get(&self, alias: &str) -> Option<&ImportTarget> {
        self.entries.get(alias)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The package name an import without an alias is referred to by.
///
/// This is the last path element, skipping a trailing major version element (`/v2`) and
/// keeping only its leading identifier part, so `gopkg.in/yaml.v3` is `yaml` and
/// `github.com/mattn/go-isatty` is `isatty`.
fn assumed_name(path: &str) -> &str {
    let mut elems = path.rsplit('/');
    let mut base = elems.next().unwrap_or(path);
    if is_major_version(base) {
        if let Some(prev) = elems.next() {
            base = prev;
        }
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    let end = base
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(base.len());
    if end == 0 {
        base
    } else {
        &base[..end]
    }
}

fn is_major_version(elem: &str) -> bool {
    elem.strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// A source file together with its import table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    file: SourceFile,
    aliases: ImportAliasTable,
}

impl LoadedFile {
    /// Builds the import table of `file`.
    pub fn new(file: SourceFile, root: &ModuleRoot) -> Self {
        let aliases = ImportAliasTable::new(file.imports(), root);
        Self { file, aliases }
    }

    /// The parsed file.
    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    /// The import table of this file.
    pub fn aliases(&self) -> &ImportAliasTable {
        &self.aliases
    }
}

/// All files of one package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    path: String,
    files: Vec<LoadedFile>,
}

impl Package {
    /// Creates a package from its parsed files.
    ///
    /// Files are ordered by name so that lookups never depend on the order the frontend
    /// produced them in.
    pub fn new(path: impl Into<String>, mut files: Vec<SourceFile>, root: &ModuleRoot) -> Self {
        files.sort_by(|a, b| a.name().cmp(b.name()));
        let files = files
            .into_iter()
            .map(|file| LoadedFile::new(file, root))
            .collect();

        Self {
            path: path.into(),
            files,
        }
    }

    /// The package path, relative to the source root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The files, ordered by name.
    pub fn files(&self) -> &[LoadedFile] {
        &self.files
    }

    /// Every struct declaration named `name`, with the file declaring it.
    ///
    /// Valid Go has at most one, but nothing here relies on it.
    pub fn structs<'p>(
        &'p self,
        name: &'p str,
    ) -> impl Iterator<Item = (&'p LoadedFile, &'p StructType)> + 'p {
        self.files.iter().flat_map(move |loaded| {
            loaded
                .file()
                .types()
                .iter()
                .filter(move |decl| decl.name() == name)
                .filter_map(move |decl| decl.as_struct().map(|st| (loaded, st)))
        })
    }
}
