#![deny(
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![warn(unreachable_pub, clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

pub mod decl;
pub use decl::{
    FieldDecl, Import, ImportAliasTable, ImportTarget, LoadedFile, ModuleRoot, Package,
    SourceFile, StructType, TypeDecl, TypeExpr,
};
mod error;
pub use error::{Error, ParseError, Result};
pub mod frontend;
pub use frontend::Frontend;
#[cfg(feature = "go-parse")]
pub use frontend::{Memory, SourceDir};
mod cache;
pub use cache::PackageCache;
pub mod reference;
pub use reference::{classify, NamedType, TypeReference};
mod description;
pub use description::{FieldDescription, TypeDescription};
mod flatten;
mod resolve;
pub use resolve::{Options, Resolver};
#[cfg(feature = "go-parse")]
pub mod parse;
