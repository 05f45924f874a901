use clap::Parser;
use std::path::PathBuf;
use structdoc::{Format, Query};
use structdoc_core::Options;

/// Print the JSON field documentation of a Go struct type and every struct it depends on.
///
/// Nothing is printed unless the module name, the package path and the type name are all
/// given.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The module path, as in the `module` line of `go.mod`.
    #[arg(long, env = "STRUCTDOC_MOD_NAME")]
    pub mod_name: Option<String>,

    /// The package of the type, relative to the source root.
    #[arg(long, env = "STRUCTDOC_PKG_PATH")]
    pub pkg_path: Option<String>,

    /// The struct type name.
    #[arg(long, env = "STRUCTDOC_NAME")]
    pub name: Option<String>,

    /// The source root of the module.
    #[arg(long, env = "STRUCTDOC_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// The struct tag key field names are read from.
    #[arg(long, default_value = "json")]
    pub tag_key: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Print each dependent type only once.
    #[arg(long)]
    pub unique: bool,

    /// Skip embedded types from outside the module instead of failing.
    #[arg(long)]
    pub skip_foreign_embeds: bool,

    /// How many types deep to follow references before giving up. At least 1.
    #[arg(
        long,
        default_value_t = 64,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_depth: usize,
}

impl Args {
    /// The query these arguments describe, if all required values are present.
    pub fn query(&self) -> Option<Query> {
        let (module, package, name) = match (&self.mod_name, &self.pkg_path, &self.name) {
            (Some(m), Some(p), Some(n)) if !m.is_empty() && !p.is_empty() && !n.is_empty() => {
                (m, p, n)
            }
            _ => return None,
        };

        Some(Query {
            root: self.root.clone(),
            module: module.clone(),
            package: package.clone(),
            name: name.clone(),
            options: Options::new()
                .with_tag_key(self.tag_key.as_str())
                .with_max_depth(self.max_depth)
                .with_skip_foreign_embeddings(self.skip_foreign_embeds),
            unique: self.unique,
        })
    }
}
