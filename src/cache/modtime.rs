use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use crate::{
    cache::{FingerprintCache, FingerprintStrategy},
    error::DocweaveError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModTimeEntry {
    source_file_modification_timestamp: i64,
    result_file_modification_timestamp: i64,
}

fn mod_timestamp(path: &Path) -> Result<i64, DocweaveError> {
    let modified = fs::metadata(path)?.modified()?;
    // Second resolution, matching the persisted format.
    match modified.duration_since(UNIX_EPOCH) {
        Ok(since) => Ok(since.as_secs() as i64),
        Err(before) => Ok(-(before.duration().as_secs() as i64)),
    }
}

/// Fingerprint = filesystem modification timestamp in Unix seconds. Cheaper
/// than hashing, but false-negative on touch-without-edit and unsafe across
/// filesystems with differing clocks.
pub struct ModTimeStrategy;

impl FingerprintStrategy for ModTimeStrategy {
    type Entry = ModTimeEntry;

    fn fingerprint_pair(
        &self,
        source_abs: &Path,
        result_abs: &Path,
    ) -> Result<ModTimeEntry, DocweaveError> {
        Ok(ModTimeEntry {
            source_file_modification_timestamp: mod_timestamp(source_abs)?,
            result_file_modification_timestamp: mod_timestamp(result_abs)?,
        })
    }
}

pub type ModTimeBasedCache = FingerprintCache<ModTimeStrategy>;

impl ModTimeBasedCache {
    pub fn new(project_root: PathBuf, output_root: PathBuf, cache_file: PathBuf) -> Self {
        FingerprintCache::with_strategy(ModTimeStrategy, project_root, output_root, cache_file)
    }
}
