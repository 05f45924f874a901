//! Type expressions.

use core::fmt;

use super::FieldDecl;

/// A Go type expression, as written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// An unqualified identifier: `int`, `Rap`.
    Ident(String),
    /// A package-qualified identifier: `mp.Jump`.
    Selector {
        /// The package name or import alias.
        qualifier: String,
        /// The type name.
        name: String,
    },
    /// `*T`.
    Pointer(Box<TypeExpr>),
    /// `[]T` (`len` is `None`) or `[N]T`.
    Array {
        /// The length expression of a fixed-size array.
        len: Option<String>,
        /// The element type.
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`.
    Map {
        /// The key type.
        key: Box<TypeExpr>,
        /// The value type.
        value: Box<TypeExpr>,
    },
    /// An inline `struct { ... }`.
    Struct(StructType),
    /// Any `interface { ... }`.
    Interface,
    /// Any `func(...) ...`.
    Func,
    /// `chan T`, `<-chan T` or `chan<- T`.
    Chan(Box<TypeExpr>),
    /// A generic instantiation such as `List[int]`; the type arguments are not kept.
    Generic(Box<TypeExpr>),
}

impl TypeExpr {
    /// Shorthand for [`TypeExpr::Ident`].
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    /// Shorthand for [`TypeExpr::Selector`].
    pub fn selector(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Selector {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }

    /// Shorthand for [`TypeExpr::Pointer`].
    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    /// Shorthand for a slice.
    pub fn slice(elem: TypeExpr) -> Self {
        TypeExpr::Array {
            len: None,
            elem: Box::new(elem),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Ident(name) => write!(f, "{name}"),
            TypeExpr::Selector { qualifier, name } => write!(f, "{qualifier}.{name}"),
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Array { len: None, elem } => write!(f, "[]{elem}"),
            TypeExpr::Array {
                len: Some(len),
                elem,
            } => write!(f, "[{len}]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Struct(st) => {
                write!(f, "struct {{")?;
                let mut first = true;
                for field in st.fields() {
                    if !first {
                        write!(f, ";")?;
                    }
                    first = false;
                    write!(f, " {field}")?;
                }
                if st.fields().is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            TypeExpr::Interface => write!(f, "interface{{}}"),
            TypeExpr::Func => write!(f, "func()"),
            TypeExpr::Chan(inner) => write!(f, "chan {inner}"),
            TypeExpr::Generic(base) => write!(f, "{base}[...]"),
        }
    }
}

/// The body of a struct type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructType {
    fields: Vec<FieldDecl>,
}

impl StructType {
    /// Creates a struct from its field declarations, in declaration order.
    pub fn new(fields: Vec<FieldDecl>) -> Self {
        Self { fields }
    }

    /// The field declarations.
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }
}
