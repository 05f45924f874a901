//! Declaration tree of Go source files.
//!
//! This is the shape a [`Frontend`](crate::Frontend) hands to the cache: per file, its imports
//! and its type declarations, with struct fields carrying their tag and trailing comment.
//! Only what the resolution needs is kept; function bodies and values are not represented.

mod expr;
pub use expr::{StructType, TypeExpr};

mod field;
pub use field::FieldDecl;

mod tag;

mod package;
pub use package::{ImportAliasTable, ImportTarget, LoadedFile, ModuleRoot, Package};

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    package: String,
    imports: Vec<Import>,
    types: Vec<TypeDecl>,
}

impl SourceFile {
    /// Creates a file named `name` (its file name within the package directory).
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            imports: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Adds an import statement.
    pub fn with_import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    /// Adds a type declaration.
    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// The file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name from the `package` clause.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The import statements, in source order.
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// The top-level type declarations, in source order.
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }
}

/// An import statement: `import alias "path"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    alias: Option<String>,
    path: String,
}

impl Import {
    /// Creates an import of `path`, optionally renamed to `alias` (which may be `_` or `.`).
    pub fn new(alias: Option<String>, path: impl Into<String>) -> Self {
        Self {
            alias,
            path: path.into(),
        }
    }

    /// The explicit local name, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The quoted import path, unquoted.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A top-level `type Name ...` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    name: String,
    ty: TypeExpr,
}

impl TypeDecl {
    /// Creates a type declaration. Definitions and aliases (`type Name = ty`) are not told
    /// apart.
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying type expression.
    pub fn ty(&self) -> &TypeExpr {
        &self.ty
    }

    /// The struct body if this declares a struct type.
    pub fn as_struct(&self) -> Option<&StructType> {
        match &self.ty {
            TypeExpr::Struct(st) => Some(st),
            _ => None,
        }
    }
}
