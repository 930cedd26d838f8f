use std::path::Path;

use crate::{cache::BuildCache, error::DocweaveError, paths::ProjectRelPath};

/// Decorator forcing one full rebuild while still refreshing the wrapped
/// cache, so subsequent normal runs start from a current entry map.
pub struct ForceRebuildCache {
    storing_cache: Box<dyn BuildCache>,
}

impl ForceRebuildCache {
    pub fn new(storing_cache: Box<dyn BuildCache>) -> Self {
        ForceRebuildCache { storing_cache }
    }
}

impl BuildCache for ForceRebuildCache {
    fn should_build(&self, _rel: &ProjectRelPath) -> bool {
        true
    }

    fn store_successful_build_result(&self, rel: &ProjectRelPath, result_abs: &Path) {
        self.storing_cache.store_successful_build_result(rel, result_abs);
    }

    fn dump(&self) -> Result<(), DocweaveError> {
        self.storing_cache.dump()
    }
}
