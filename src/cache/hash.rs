use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};

use crate::{
    cache::{FingerprintCache, FingerprintStrategy},
    error::DocweaveError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashEntry {
    source_file_hash: String,
    result_file_hash: String,
}

fn sha256_hex(path: &Path) -> Result<String, DocweaveError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprint = SHA-256 content digest of the whole file, hex-encoded.
pub struct HashStrategy;

impl FingerprintStrategy for HashStrategy {
    type Entry = HashEntry;

    fn fingerprint_pair(
        &self,
        source_abs: &Path,
        result_abs: &Path,
    ) -> Result<HashEntry, DocweaveError> {
        Ok(HashEntry {
            source_file_hash: sha256_hex(source_abs)?,
            result_file_hash: sha256_hex(result_abs)?,
        })
    }
}

pub type HashBasedCache = FingerprintCache<HashStrategy>;

impl HashBasedCache {
    pub fn new(project_root: PathBuf, output_root: PathBuf, cache_file: PathBuf) -> Self {
        FingerprintCache::with_strategy(HashStrategy, project_root, output_root, cache_file)
    }
}
