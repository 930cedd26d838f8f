use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::paths::OutputRelPath;

#[derive(Default)]
struct Inner {
    files: HashSet<OutputRelPath>,
    dirs: HashSet<OutputRelPath>,
}

/// Registry of everything written into the output tree during one run.
///
/// `insert` may be called concurrently from build workers; the lookup methods
/// must only be called after all workers have joined. Registering a file
/// implicitly registers every ancestor directory up to the output root.
#[derive(Default)]
pub struct ProcessedPaths {
    inner: Mutex<Inner>,
}

impl ProcessedPaths {
    pub fn new() -> Self {
        ProcessedPaths::default()
    }

    pub fn insert(&self, file: OutputRelPath) {
        let mut inner = self.inner.lock();
        let mut ancestor: PathBuf = file.as_path().to_path_buf();
        while ancestor.pop() && !ancestor.as_os_str().is_empty() {
            inner.dirs.insert(OutputRelPath::new(ancestor.clone()));
        }
        inner.files.insert(file);
    }

    pub fn contains_file(&self, rel: &OutputRelPath) -> bool {
        self.inner.lock().files.contains(rel)
    }

    pub fn contains_dir(&self, rel: &OutputRelPath) -> bool {
        self.inner.lock().dirs.contains(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_registers_ancestor_dirs() {
        let processed = ProcessedPaths::new();
        processed.insert(OutputRelPath::new("a/b/c.go.html"));

        assert!(processed.contains_file(&OutputRelPath::new("a/b/c.go.html")));
        assert!(processed.contains_dir(&OutputRelPath::new("a/b")));
        assert!(processed.contains_dir(&OutputRelPath::new("a")));
        assert!(!processed.contains_dir(&OutputRelPath::new("a/b/c.go.html")));
        assert!(!processed.contains_file(&OutputRelPath::new("a/b")));
    }

    #[test]
    fn top_level_file_registers_no_dirs() {
        let processed = ProcessedPaths::new();
        processed.insert(OutputRelPath::new("main.rs.html"));
        assert!(processed.contains_file(&OutputRelPath::new("main.rs.html")));
        assert!(!processed.contains_dir(&OutputRelPath::new("")));
    }
}
