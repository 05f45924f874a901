use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use tracing::{debug, trace};

use crate::{
    decl::{ModuleRoot, Package},
    Frontend, Result,
};

type Slot = Arc<Mutex<Option<Arc<Package>>>>;

/// Parsed packages, keyed by package path.
///
/// Each package is parsed at most once per cache, the first time it is [loaded]. Entries are
/// never evicted. Failed loads are not remembered, so a later load of the same path tries
/// again.
///
/// The cache can be shared between threads. Concurrent first loads of the same path wait for
/// each other rather than parsing twice.
///
/// [loaded]: PackageCache::load
#[derive(Debug)]
pub struct PackageCache<F> {
    frontend: F,
    module: ModuleRoot,
    slots: Mutex<HashMap<String, Slot>>,
    parsed: AtomicUsize,
}

impl<F> PackageCache<F>
where
    F: Frontend,
{
    /// Creates an empty cache on top of `frontend`.
    ///
    /// `module` is the module path import paths are made relative to.
    pub fn new(frontend: F, module: ModuleRoot) -> Self {
        Self {
            frontend,
            module,
            slots: Mutex::new(HashMap::new()),
            parsed: AtomicUsize::new(0),
        }
    }

    /// The package at `path` (relative to the source root), parsing it on first use.
    pub fn load(&self, path: &str) -> Result<Arc<Package>> {
        let slot = {
            let mut slots = lock(&self.slots);
            slots.entry(path.to_string()).or_default().clone()
        };

        // Held across the parse so that racing loaders of the same path block here.
        let mut slot = lock(&slot);
        if let Some(package) = slot.as_ref() {
            trace!("package `{path}` served from cache");
            return Ok(package.clone());
        }

        debug!("parsing package `{path}`");
        let files = self.frontend.parse_package(path)?;
        self.parsed.fetch_add(1, Ordering::Relaxed);
        let package = Arc::new(Package::new(path, files, &self.module));
        debug!("parsed package `{path}` ({} files)", package.files().len());
        *slot = Some(package.clone());

        Ok(package)
    }

    /// How many packages this cache has parsed successfully.
    pub fn parsed_count(&self) -> usize {
        self.parsed.load(Ordering::Relaxed)
    }

    /// The module root.
    pub fn module(&self) -> &ModuleRoot {
        &self.module
    }

    /// The frontend the packages are parsed with.
    pub fn frontend(&self) -> &F {
        &self.frontend
    }
}

// A panic while a slot was held leaves it either empty or filled, both of which are valid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decl::SourceFile, ParseError};
    use std::{sync::atomic::AtomicBool, thread, time::Duration};

    /// Counts calls and fails for `broken` until `fixed` is set.
    #[derive(Debug, Default)]
    struct Counting {
        calls: AtomicUsize,
        fixed: AtomicBool,
        slow: bool,
    }

    impl Frontend for Counting {
        fn parse_package(
            &self,
            package: &str,
        ) -> core::result::Result<Vec<SourceFile>, ParseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.slow {
                thread::sleep(Duration::from_millis(20));
            }
            if package == "broken" && !self.fixed.load(Ordering::SeqCst) {
                return Err(ParseError::missing(package));
            }

            Ok(vec![
                SourceFile::new("b.go", "p"),
                SourceFile::new("a.go", "p"),
            ])
        }
    }

    #[test_log::test]
    fn load_is_idempotent() {
        let cache = PackageCache::new(Counting::default(), ModuleRoot::new("example.com/m"));
        assert_eq!(cache.module().as_str(), "example.com/m");

        let first = cache.load("demo/pkg1").unwrap();
        let second = cache.load("demo/pkg1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.path(), "demo/pkg1");
        assert_eq!(first.files()[0].file().name(), "a.go");

        cache.load("demo/pkg2").unwrap();
        assert_eq!(cache.parsed_count(), 2);
        assert_eq!(cache.frontend().calls.load(Ordering::SeqCst), 2);
    }

    #[test_log::test]
    fn failures_are_not_cached() {
        let cache = PackageCache::new(Counting::default(), ModuleRoot::default());

        let err = cache.load("broken").unwrap_err();
        assert!(matches!(&err, crate::Error::Parse(e) if e.package() == "broken"));
        assert!(cache.load("broken").is_err());
        assert_eq!(cache.parsed_count(), 0);

        cache.frontend().fixed.store(true, Ordering::SeqCst);
        cache.load("broken").unwrap();
        cache.load("broken").unwrap();
        assert_eq!(cache.parsed_count(), 1);
        assert_eq!(cache.frontend().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn concurrent_first_loads_parse_once() {
        let frontend = Counting {
            slow: true,
            ..Default::default()
        };
        let cache = PackageCache::new(frontend, ModuleRoot::default());

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    cache.load("shared").unwrap();
                    cache.load("other").unwrap();
                });
            }
        });

        assert_eq!(cache.parsed_count(), 2);
        assert_eq!(cache.frontend().calls.load(Ordering::SeqCst), 2);
    }
}
