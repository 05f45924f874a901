//! Classification of field types.

use core::fmt;

use crate::decl::{ImportAliasTable, ImportTarget, StructType, TypeExpr};

/// What a field's type expression refers to.
///
/// Produced by [`classify`]; wrappers (pointers, slices and arrays) come first, the referenced
/// type is the innermost variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference<'a> {
    /// A type declared in a package of the module.
    Named(NamedType),
    /// A predeclared type such as `int` or `string`.
    Builtin(&'a str),
    /// A type of a package outside the module, or behind an import we do not know.
    Foreign {
        /// The package qualifier as written.
        qualifier: &'a str,
        /// The import path the qualifier stands for, if it is imported at all.
        import_path: Option<&'a str>,
        /// The type name.
        name: &'a str,
    },
    /// `*T`.
    Pointer(Box<TypeReference<'a>>),
    /// `[]T` or `[N]T`.
    Sequence(Box<TypeReference<'a>>),
    /// An inline `struct { ... }`.
    AnonymousComposite(&'a StructType),
    /// A type whose shape is not statically known: interfaces, maps, functions, channels,
    /// generic instantiations.
    Opaque,
}

/// A reference to a type of the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    package: String,
    name: String,
    qualifier: Option<String>,
}

impl NamedType {
    /// Creates a reference to `name` in `package`, written with `qualifier` if any.
    pub fn new(
        package: impl Into<String>,
        name: impl Into<String>,
        qualifier: Option<String>,
    ) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            qualifier,
        }
    }

    /// The package path, relative to the source root.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The qualifier the type is referred to with, if it is declared in another package.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }
}

impl TypeReference<'_> {
    /// The type as shown in a field description.
    ///
    /// Wrappers render as `*` and `[]`, named types as written (`mp.Jump`), inline structs as
    /// `struct` and opaque types as `Object`.
    pub fn signature(&self) -> String {
        self.to_string()
    }

    /// The referenced type, with all pointer and sequence wrappers removed.
    pub fn innermost(&self) -> &Self {
        match self {
            TypeReference::Pointer(inner) | TypeReference::Sequence(inner) => inner.innermost(),
            other => other,
        }
    }

    /// The referenced type, with pointer wrappers removed.
    pub fn strip_pointers(&self) -> &Self {
        match self {
            TypeReference::Pointer(inner) => inner.strip_pointers(),
            other => other,
        }
    }

    /// The module type this refers to, through any wrappers.
    pub fn named(&self) -> Option<&NamedType> {
        match self.innermost() {
            TypeReference::Named(named) => Some(named),
            _ => None,
        }
    }
}

impl fmt::Display for TypeReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Named(named) => match &named.qualifier {
                Some(qualifier) => write!(f, "{qualifier}.{}", named.name),
                None => write!(f, "{}", named.name),
            },
            TypeReference::Builtin(name) => write!(f, "{name}"),
            TypeReference::Foreign {
                qualifier, name, ..
            } => write!(f, "{qualifier}.{name}"),
            TypeReference::Pointer(inner) => write!(f, "*{inner}"),
            TypeReference::Sequence(inner) => write!(f, "[]{inner}"),
            TypeReference::AnonymousComposite(_) => write!(f, "struct"),
            TypeReference::Opaque => write!(f, "Object"),
        }
    }
}

/// Classifies `expr`, written in a file with the import table `aliases` of the package
/// `current_package`.
///
/// Never fails: forms that cannot be described are [`TypeReference::Opaque`].
pub fn classify<'a>(
    expr: &'a TypeExpr,
    aliases: &'a ImportAliasTable,
    current_package: &str,
) -> TypeReference<'a> {
    let reference = match expr {
        TypeExpr::Pointer(inner) => {
            TypeReference::Pointer(Box::new(classify(inner, aliases, current_package)))
        }
        TypeExpr::Array { elem, .. } => {
            TypeReference::Sequence(Box::new(classify(elem, aliases, current_package)))
        }
        TypeExpr::Struct(st) => TypeReference::AnonymousComposite(st),
        TypeExpr::Ident(name) if name == "any" => TypeReference::Opaque,
        TypeExpr::Ident(name) if is_builtin(name) => TypeReference::Builtin(name.as_str()),
        TypeExpr::Ident(name) => {
            TypeReference::Named(NamedType::new(current_package, name.as_str(), None))
        }
        TypeExpr::Selector { qualifier, name } => match aliases.get(qualifier) {
            Some(ImportTarget::Local(package)) => TypeReference::Named(NamedType::new(
                package.as_str(),
                name.as_str(),
                Some(qualifier.clone()),
            )),
            Some(ImportTarget::External(path)) => TypeReference::Foreign {
                qualifier: qualifier.as_str(),
                import_path: Some(path.as_str()),
                name: name.as_str(),
            },
            None => TypeReference::Foreign {
                qualifier: qualifier.as_str(),
                import_path: None,
                name: name.as_str(),
            },
        },
        TypeExpr::Map { .. }
        | TypeExpr::Interface
        | TypeExpr::Func
        | TypeExpr::Chan(_)
        | TypeExpr::Generic(_) => TypeReference::Opaque,
    };
    tracing::trace!("classified `{expr}` as {reference:?}");

    reference
}

fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "bool"
            | "byte"
            | "comparable"
            | "complex64"
            | "complex128"
            | "error"
            | "float32"
            | "float64"
            | "int"
            | "int8"
            | "int16"
            | "int32"
            | "int64"
            | "rune"
            | "string"
            | "uint"
            | "uint8"
            | "uint16"
            | "uint32"
            | "uint64"
            | "uintptr"
    )
}
