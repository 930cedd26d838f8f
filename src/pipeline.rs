//! The concurrent build run.
//!
//! One producer walks the project tree and hands build tasks over a bounded
//! channel; a consumer spawns one worker per task and joins them all. A task
//! failure is logged and skips that file only, never the run. After the
//! workers have joined, a reconciliation walk deletes every output entry that
//! no current source file accounts for, and the cache is dumped once.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::{
    cache::BuildCache,
    config::LanguageRegistry,
    error::DocweaveError,
    ignorer::PathIgnorer,
    page,
    paths::{OutputRelPath, ProcessedPaths, ProjectRelPath},
    resolve::LinkResolver,
};

/// Deliberately tiny: the walk is cheap next to rendering, so there is
/// nothing to gain from queueing ahead, and a larger buffer only delays
/// cache-skip log lines relative to the work they describe.
const TASK_QUEUE_CAPACITY: usize = 1;

/// Everything a worker needs to build one page.
struct BuildTask {
    project_root: PathBuf,
    output_root: PathBuf,
    source_abs: PathBuf,
    output_abs: PathBuf,
    source_rel: ProjectRelPath,
}

pub struct BuildPipeline {
    registry: Arc<LanguageRegistry>,
    cache: Arc<dyn BuildCache>,
    ignorer: Arc<dyn PathIgnorer>,
}

impl BuildPipeline {
    pub fn new(
        registry: Arc<LanguageRegistry>,
        cache: Arc<dyn BuildCache>,
        ignorer: Arc<dyn PathIgnorer>,
    ) -> Self {
        BuildPipeline {
            registry,
            cache,
            ignorer,
        }
    }

    /// Run one full build of `project_root` into `output_root`.
    ///
    /// Both roots are made absolute first; `output_root` must already exist.
    pub async fn run(&self, project_root: &Path, output_root: &Path) -> Result<(), DocweaveError> {
        let project_root = std::path::absolute(project_root)?;
        let output_root = std::path::absolute(output_root)?;
        let processed = Arc::new(ProcessedPaths::new());

        let (tx, mut rx) = mpsc::channel::<BuildTask>(TASK_QUEUE_CAPACITY);
        let producer = tokio::spawn(produce_tasks(
            tx,
            project_root.clone(),
            output_root.clone(),
            Arc::clone(&self.cache),
            Arc::clone(&self.ignorer),
            Arc::clone(&processed),
        ));

        let mut workers = Vec::new();
        while let Some(task) = rx.recv().await {
            workers.push(tokio::spawn(run_task(
                task,
                Arc::clone(&self.registry),
                Arc::clone(&self.cache),
                Arc::clone(&self.ignorer),
                Arc::clone(&processed),
            )));
        }
        producer.await?;
        for worker in workers {
            worker.await?;
        }

        reconcile_output_tree(&output_root, &processed);

        if let Err(err) = self.cache.dump() {
            tracing::error!("Could not persist the build cache: {err}");
        }
        Ok(())
    }
}

/// Walk the project tree and send one task per file that needs building.
///
/// The output root (when nested inside the project) and ignored directories
/// are pruned from the walk entirely. Unreadable entries are logged and
/// skipped.
async fn produce_tasks(
    tx: mpsc::Sender<BuildTask>,
    project_root: PathBuf,
    output_root: PathBuf,
    cache: Arc<dyn BuildCache>,
    ignorer: Arc<dyn PathIgnorer>,
    processed: Arc<ProcessedPaths>,
) {
    let mut walker = WalkDir::new(&project_root).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry in the project walk: {err}");
                continue;
            }
        };
        let abs = entry.path();
        if abs == project_root {
            continue;
        }
        if abs == output_root {
            tracing::debug!("Pruning the output root from the project walk");
            walker.skip_current_dir();
            continue;
        }
        let rel = match ProjectRelPath::from_absolute(&project_root, abs) {
            Ok(rel) => rel,
            Err(err) => {
                tracing::warn!("Skipping {}: {err}", abs.display());
                continue;
            }
        };
        if entry.file_type().is_dir() {
            if ignorer.should_ignore(&rel, true) {
                tracing::debug!("Pruning ignored directory {rel}");
                walker.skip_current_dir();
            }
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        if ignorer.should_ignore(&rel, false) {
            tracing::debug!("Skipping ignored file {rel}");
            continue;
        }
        if !cache.should_build(&rel) {
            tracing::debug!("Skipping {rel}: generated page is current");
            // A current page still has to survive reconciliation.
            match OutputRelPath::from_absolute(&output_root, &rel.output_page_path(&output_root)) {
                Ok(out_rel) => processed.insert(out_rel),
                Err(err) => tracing::warn!("Could not register current page for {rel}: {err}"),
            }
            continue;
        }
        let task = BuildTask {
            output_abs: rel.output_page_path(&output_root),
            source_abs: abs.to_path_buf(),
            source_rel: rel,
            project_root: project_root.clone(),
            output_root: output_root.clone(),
        };
        if tx.send(task).await.is_err() {
            tracing::warn!("Task receiver dropped, abandoning the project walk");
            return;
        }
    }
}

async fn run_task(
    task: BuildTask,
    registry: Arc<LanguageRegistry>,
    cache: Arc<dyn BuildCache>,
    ignorer: Arc<dyn PathIgnorer>,
    processed: Arc<ProcessedPaths>,
) {
    match build_page(&task, &registry, ignorer.as_ref()) {
        Ok(true) => {
            match OutputRelPath::from_absolute(&task.output_root, &task.output_abs) {
                Ok(rel) => processed.insert(rel),
                Err(err) => {
                    tracing::warn!("Could not register output for {}: {err}", task.source_rel);
                    return;
                }
            }
            cache.store_successful_build_result(&task.source_rel, &task.output_abs);
        }
        Ok(false) => {
            tracing::debug!("Skipping {}: unsupported file type", task.source_rel);
        }
        Err(err) => {
            tracing::error!("Build failed for {}: {err}", task.source_rel);
        }
    }
}

/// Build one page. `Ok(false)` means the file's extension maps to no known
/// language; that is a quiet skip, not a failure.
fn build_page(
    task: &BuildTask,
    registry: &LanguageRegistry,
    ignorer: &dyn PathIgnorer,
) -> Result<bool, DocweaveError> {
    let Some(info) = registry.lookup_path(&task.source_abs) else {
        return Ok(false);
    };
    tracing::debug!("Building page for {} ({})", task.source_rel, info.name);

    let source = fs::read_to_string(&task.source_abs)?;
    let resolver = LinkResolver::new(
        &task.project_root,
        &task.source_abs,
        &task.output_root,
        &task.output_abs,
        registry,
        ignorer,
    );
    let html = page::render_document(&source, info, registry.marker(), &resolver)?;

    if let Some(parent) = task.output_abs.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&task.output_abs, html)?;
    Ok(true)
}

/// Delete every entry under the output root that this run did not produce or
/// refresh: pages whose sources were removed, and directories that held only
/// such pages. Deletion failures are logged and left behind.
fn reconcile_output_tree(output_root: &Path, processed: &ProcessedPaths) {
    let mut walker = WalkDir::new(output_root).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry in the output walk: {err}");
                continue;
            }
        };
        if entry.path() == output_root {
            continue;
        }
        let rel = match OutputRelPath::from_absolute(output_root, entry.path()) {
            Ok(rel) => rel,
            Err(err) => {
                tracing::warn!("Skipping {}: {err}", entry.path().display());
                continue;
            }
        };
        let is_dir = entry.file_type().is_dir();
        let keep = if is_dir {
            processed.contains_dir(&rel)
        } else {
            processed.contains_file(&rel)
        };
        if keep {
            continue;
        }
        let removed = if is_dir {
            fs::remove_dir_all(entry.path())
        } else {
            fs::remove_file(entry.path())
        };
        match removed {
            Ok(()) => tracing::debug!("Deleted stale output entry {rel}"),
            Err(err) => tracing::warn!("Could not delete stale output entry {rel}: {err}"),
        }
        if is_dir {
            // Contents went with the directory.
            walker.skip_current_dir();
        }
    }
}
