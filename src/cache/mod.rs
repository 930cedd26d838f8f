//! Incremental build cache.
//!
//! The cache decides, per project-relative path, whether the generated page
//! is still current, and persists what it learned to a JSON sidecar file so
//! the next run can skip unchanged files. Two fingerprint strategies share
//! one rebuild decision ([`FingerprintCache`]); an always-empty stub and a
//! force-rebuild decorator round out the set.
//!
//! Contract: `should_build` and `store_successful_build_result` may be called
//! concurrently from build workers; `dump` must be called at most once, after
//! every other call for the run has returned.

mod always_empty;
mod force;
mod hash;
mod modtime;

pub use always_empty::AlwaysEmptyCache;
pub use force::ForceRebuildCache;
pub use hash::{HashBasedCache, HashStrategy};
pub use modtime::{ModTimeBasedCache, ModTimeStrategy};

use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{error::DocweaveError, paths::ProjectRelPath};

/// Default name of the JSON sidecar, created in the project root.
pub const DEFAULT_CACHE_FILE_NAME: &str = ".docweave_cache.json";

pub trait BuildCache: Send + Sync {
    /// Whether the page for `rel` must be (re)built. Fail-open: any doubt
    /// (missing entry, unreadable file, fingerprint error) answers `true`.
    fn should_build(&self, rel: &ProjectRelPath) -> bool;

    /// Record a fresh entry for a path whose page was just written to
    /// `result_abs`.
    fn store_successful_build_result(&self, rel: &ProjectRelPath, result_abs: &Path);

    /// Serialize the current entry map to the cache file.
    fn dump(&self) -> Result<(), DocweaveError>;
}

/// Persisted form of the cache. A cache is only valid for the output tree it
/// was built against: on load, a mismatched `absolute_path_to_result_dir`
/// discards the whole entry map.
#[derive(Debug, Serialize, Deserialize)]
struct CacheData<E> {
    absolute_path_to_result_dir: PathBuf,
    entries: BTreeMap<ProjectRelPath, E>,
}

fn load_previous_entries<E: DeserializeOwned>(
    cache_file: &Path,
    output_root: &Path,
) -> BTreeMap<ProjectRelPath, E> {
    let raw = match fs::read_to_string(cache_file) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(
                "No usable cache file at {}: {err}, starting with an empty cache",
                cache_file.display()
            );
            return BTreeMap::new();
        }
    };
    let data: CacheData<E> = match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(
                "Could not parse cache file {}: {err}, starting with an empty cache",
                cache_file.display()
            );
            return BTreeMap::new();
        }
    };
    if data.absolute_path_to_result_dir != output_root {
        tracing::warn!(
            "Cache file {} was built for output root {}, not {}, starting with an empty cache",
            cache_file.display(),
            data.absolute_path_to_result_dir.display(),
            output_root.display()
        );
        return BTreeMap::new();
    }
    tracing::debug!(
        "Loaded {} cache entries from {}",
        data.entries.len(),
        cache_file.display()
    );
    data.entries
}

/// A concrete way of fingerprinting a (source, result) file pair. The entry
/// type carries the persisted JSON field names, which differ per strategy.
pub trait FingerprintStrategy: Send + Sync {
    type Entry: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;

    fn fingerprint_pair(
        &self,
        source_abs: &Path,
        result_abs: &Path,
    ) -> Result<Self::Entry, DocweaveError>;
}

/// The rebuild decision shared by both fingerprint strategies.
///
/// The previous (loaded) entry map is immutable for the whole run; only the
/// current map mutates, so concurrent `should_build` calls never race with
/// what they read. A cache hit copies its previous entry into the current
/// map — otherwise a no-op run would dump an empty cache and force a full
/// rebuild next time.
pub struct FingerprintCache<S: FingerprintStrategy> {
    project_root: PathBuf,
    output_root: PathBuf,
    cache_file: PathBuf,
    previous: BTreeMap<ProjectRelPath, S::Entry>,
    current: Mutex<BTreeMap<ProjectRelPath, S::Entry>>,
    strategy: S,
}

impl<S: FingerprintStrategy> FingerprintCache<S> {
    pub fn with_strategy(
        strategy: S,
        project_root: PathBuf,
        output_root: PathBuf,
        cache_file: PathBuf,
    ) -> Self {
        let previous = load_previous_entries(&cache_file, &output_root);
        FingerprintCache {
            project_root,
            output_root,
            cache_file,
            previous,
            current: Mutex::new(BTreeMap::new()),
            strategy,
        }
    }
}

impl<S: FingerprintStrategy> BuildCache for FingerprintCache<S> {
    fn should_build(&self, rel: &ProjectRelPath) -> bool {
        let Some(previous) = self.previous.get(rel) else {
            tracing::debug!("No cache entry for {rel}");
            return true;
        };
        let source_abs = rel.to_absolute(&self.project_root);
        let result_abs = rel.output_page_path(&self.output_root);
        match self.strategy.fingerprint_pair(&source_abs, &result_abs) {
            Ok(fresh) if fresh == *previous => {
                self.current.lock().insert(rel.clone(), previous.clone());
                false
            }
            Ok(_) => {
                tracing::debug!("Fingerprints for {rel} differ from the cached values");
                true
            }
            Err(err) => {
                tracing::debug!("Could not fingerprint {rel}: {err}, treating as stale");
                true
            }
        }
    }

    fn store_successful_build_result(&self, rel: &ProjectRelPath, result_abs: &Path) {
        let source_abs = rel.to_absolute(&self.project_root);
        match self.strategy.fingerprint_pair(&source_abs, result_abs) {
            Ok(entry) => {
                self.current.lock().insert(rel.clone(), entry);
            }
            Err(err) => {
                tracing::warn!("Could not fingerprint {rel} after a successful build: {err}");
            }
        }
    }

    fn dump(&self) -> Result<(), DocweaveError> {
        let data = CacheData {
            absolute_path_to_result_dir: self.output_root.clone(),
            entries: self.current.lock().clone(),
        };
        let serialized = serde_json::to_string(&data)?;
        fs::write(&self.cache_file, serialized)?;
        tracing::debug!(
            "Dumped {} cache entries to {}",
            data.entries.len(),
            self.cache_file.display()
        );
        Ok(())
    }
}

/// Cache strategy selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "bin", derive(clap::ValueEnum))]
pub enum CacheMode {
    /// Disable caching entirely.
    None,
    /// Compare filesystem modification timestamps (cheap; false negatives on
    /// touch-without-edit and across filesystems with differing clocks).
    Modtime,
    /// Compare SHA-256 content digests.
    Hash,
}

/// Build the cache stack for a run: strategy per `mode`, optionally wrapped
/// in the force-rebuild decorator.
pub fn init_cache(
    mode: CacheMode,
    force_rebuild: bool,
    project_root: PathBuf,
    output_root: PathBuf,
    cache_file: PathBuf,
) -> Arc<dyn BuildCache> {
    let inner: Box<dyn BuildCache> = match mode {
        CacheMode::None => {
            tracing::debug!("Using the always-empty build cache");
            return Arc::new(AlwaysEmptyCache);
        }
        CacheMode::Modtime => {
            tracing::debug!("Using the modification-time-based build cache");
            Box::new(ModTimeBasedCache::new(project_root, output_root, cache_file))
        }
        CacheMode::Hash => {
            tracing::debug!("Using the hash-based build cache");
            Box::new(HashBasedCache::new(project_root, output_root, cache_file))
        }
    };
    if force_rebuild {
        tracing::debug!("Forcing a full rebuild on top of the selected cache");
        Arc::new(ForceRebuildCache::new(inner))
    } else {
        Arc::from(inner)
    }
}
