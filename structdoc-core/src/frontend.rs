//! Sources of declaration trees.
//!
//! The [`PackageCache`](crate::PackageCache) never reads source text itself; it asks a
//! [`Frontend`] for the parsed files of a package path.

use crate::{decl::SourceFile, ParseError};

#[cfg(feature = "go-parse")]
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Turns a package path into the parsed files of that package.
pub trait Frontend {
    /// Parses every source file of `package`.
    ///
    /// The order of the returned files does not matter.
    fn parse_package(&self, package: &str) -> Result<Vec<SourceFile>, ParseError>;
}

impl<F> Frontend for &F
where
    F: Frontend + ?Sized,
{
    fn parse_package(&self, package: &str) -> Result<Vec<SourceFile>, ParseError> {
        (**self).parse_package(package)
    }
}

impl<F> Frontend for Box<F>
where
    F: Frontend + ?Sized,
{
    fn parse_package(&self, package: &str) -> Result<Vec<SourceFile>, ParseError> {
        (**self).parse_package(package)
    }
}

/// Go sources on disk, one directory per package under a common root.
#[cfg(feature = "go-parse")]
#[derive(Debug, Clone)]
pub struct SourceDir {
    root: PathBuf,
}

#[cfg(feature = "go-parse")]
impl SourceDir {
    /// Creates a frontend reading packages under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The source root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn package_dir(&self, package: &str) -> PathBuf {
        if package.is_empty() {
            self.root.clone()
        } else {
            self.root.join(package)
        }
    }
}

#[cfg(feature = "go-parse")]
impl Frontend for SourceDir {
    fn parse_package(&self, package: &str) -> Result<Vec<SourceFile>, ParseError> {
        let dir = self.package_dir(package);
        let entries = fs::read_dir(&dir).map_err(|e| ParseError::io(package, None, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ParseError::io(package, None, e))?;
            let path = entry.path();
            let is_source = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".go") && !n.ends_with("_test.go"));
            if is_source && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let source = fs::read_to_string(&path)
                .map_err(|e| ParseError::io(package, Some(name.clone()), e))?;
            tracing::trace!("parsing {}", path.display());
            files.push(parse(package, &name, &source)?);
        }

        Ok(files)
    }
}

/// Go sources held in memory, keyed by package path.
#[cfg(feature = "go-parse")]
#[derive(Debug, Clone, Default)]
pub struct Memory {
    packages: BTreeMap<String, Vec<(String, String)>>,
}

#[cfg(feature = "go-parse")]
impl Memory {
    /// Creates an empty frontend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the file `name` with `source` to `package`.
    pub fn with_file(
        mut self,
        package: impl Into<String>,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.add_file(package, name, source);
        self
    }

    /// Adds the file `name` with `source` to `package`.
    pub fn add_file(
        &mut self,
        package: impl Into<String>,
        name: impl Into<String>,
        source: impl Into<String>,
    ) {
        self.packages
            .entry(package.into())
            .or_default()
            .push((name.into(), source.into()));
    }
}

#[cfg(feature = "go-parse")]
impl Frontend for Memory {
    fn parse_package(&self, package: &str) -> Result<Vec<SourceFile>, ParseError> {
        let sources = self
            .packages
            .get(package)
            .ok_or_else(|| ParseError::missing(package))?;

        sources
            .iter()
            .map(|(name, source)| parse(package, name, source))
            .collect()
    }
}

#[cfg(feature = "go-parse")]
fn parse(package: &str, name: &str, source: &str) -> Result<SourceFile, ParseError> {
    crate::parse::parse_file(name, source)
        .map_err(|e| ParseError::syntax(package, name, e.line(), e.message()))
}

#[cfg(all(test, feature = "go-parse"))]
mod tests {
    use super::*;

    #[test]
    fn source_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("demo/pkg1");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.go"), "package pkg1\n\ntype B struct{}\n").unwrap();
        fs::write(dir.join("a.go"), "package pkg1\n\ntype A struct{}\n").unwrap();
        fs::write(dir.join("a_test.go"), "package pkg1\n\ntype T struct{}\n").unwrap();
        fs::write(dir.join("README.md"), "# not go").unwrap();
        fs::create_dir(dir.join("sub.go")).unwrap();

        let frontend = SourceDir::new(root.path());
        let files = frontend.parse_package("demo/pkg1").unwrap();
        let names: Vec<_> = files.iter().map(SourceFile::name).collect();
        assert_eq!(names, ["a.go", "b.go"]);
    }

    #[test]
    fn source_dir_errors() {
        let root = tempfile::tempdir().unwrap();
        let frontend = SourceDir::new(root.path());

        let err = frontend.parse_package("missing").unwrap_err();
        assert_eq!(err.package(), "missing");
        assert_eq!(err.file(), None);

        fs::write(root.path().join("bad.go"), "package root\n\ntype {\n").unwrap();
        let err = frontend.parse_package("").unwrap_err();
        assert_eq!(err.file(), Some("bad.go"));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn memory() {
        let frontend = Memory::new()
            .with_file("p", "x.go", "package p\n\ntype X struct{ A int }\n")
            .with_file("p", "y.go", "package p\n");

        let files = frontend.parse_package("p").unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].types()[0].name(), "X");

        let err = frontend.parse_package("q").unwrap_err();
        assert_eq!(err.message(), "no such package");

        // Through a reference and a box too.
        let boxed: Box<dyn Frontend> = Box::new(frontend.clone());
        assert_eq!((&boxed).parse_package("p").unwrap().len(), 2);
    }
}
