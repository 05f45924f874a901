//! Describe Go struct types the way `encoding/json` sees them.

use std::{io::Write, path::PathBuf};

use structdoc_core::{ModuleRoot, Options, PackageCache, Resolver, SourceDir, TypeDescription};

mod error;
pub use error::Error;

/// What to describe, and where to find it.
#[derive(Debug, Clone)]
pub struct Query {
    /// The directory holding the module's sources (where `go.mod` is).
    pub root: PathBuf,
    /// The module path, stripped from import paths.
    pub module: String,
    /// The package path, relative to `root`.
    pub package: String,
    /// The struct type name.
    pub name: String,
    /// Resolution options.
    pub options: Options,
    /// Report each dependent type only once.
    pub unique: bool,
}

/// How to print descriptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// `Name:` followed by one `|name|type|description|` line per field.
    #[default]
    Text,
    /// A pretty-printed JSON array.
    Json,
}

/// Resolves the type the query names, followed by its dependents.
pub fn describe(query: &Query) -> Result<Vec<TypeDescription>, Error> {
    if !query.root.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "`{}` is not a directory",
            query.root.display()
        )));
    }
    let package = package_path(&query.package)?;

    tracing::debug!(
        "describing `{}` in `{package}` under {}",
        query.name,
        query.root.display()
    );
    let cache = PackageCache::new(
        SourceDir::new(&query.root),
        ModuleRoot::new(query.module.as_str()),
    );
    let resolver = Resolver::new(&cache).with_options(query.options.clone());
    let types = if query.unique {
        resolver.resolve_unique(package, &query.name)?
    } else {
        resolver.resolve(package, &query.name)?
    };

    Ok(types)
}

/// Writes `types` to `out` in the given format.
pub fn render<W>(types: &[TypeDescription], format: Format, out: &mut W) -> Result<(), Error>
where
    W: Write,
{
    match format {
        Format::Text => {
            for ty in types {
                writeln!(out, "{}:", ty.name())?;
                for field in ty.fields() {
                    writeln!(
                        out,
                        "    |{}|{}|{}|",
                        field.name(),
                        field.ty(),
                        field.description()
                    )?;
                }
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, types)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

// Accepts `demo/pkg2`, `./demo/pkg2/` and `.` (the module root itself).
fn package_path(package: &str) -> Result<&str, Error> {
    if package.starts_with('/') {
        return Err(Error::InvalidArgument(format!(
            "package path `{package}` must be relative to the source root"
        )));
    }
    let package = package.trim_end_matches('/');
    let package = package.strip_prefix("./").unwrap_or(package);

    Ok(if package == "." { "" } else { package })
}
