use std::path::Path;

use crate::{cache::BuildCache, error::DocweaveError, paths::ProjectRelPath};

/// Disables caching entirely: everything is always stale, nothing is
/// recorded, nothing is persisted.
pub struct AlwaysEmptyCache;

impl BuildCache for AlwaysEmptyCache {
    fn should_build(&self, _rel: &ProjectRelPath) -> bool {
        true
    }

    fn store_successful_build_result(&self, _rel: &ProjectRelPath, _result_abs: &Path) {}

    fn dump(&self) -> Result<(), DocweaveError> {
        Ok(())
    }
}
