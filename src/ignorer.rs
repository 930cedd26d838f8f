//! Gitignore-style exclusion of project paths.
//!
//! Consumed as a plain boolean predicate by the build pipeline (to prune the
//! walk) and by the link resolver (to decide whether a link target gets a
//! generated page).

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::{error::DocweaveError, paths::ProjectRelPath};

/// Name of the ignore file read from the project root.
pub const IGNORE_FILE_NAME: &str = ".docweaveignore";

pub trait PathIgnorer: Send + Sync {
    fn should_ignore(&self, rel: &ProjectRelPath, is_dir: bool) -> bool;
}

/// Ignorer backed by a gitignore-syntax file at the project root. A missing
/// file means "ignore nothing" rather than an error.
pub struct GitignoreIgnorer {
    matcher: Gitignore,
}

impl GitignoreIgnorer {
    pub fn from_project_root(project_root: &Path) -> Result<Self, DocweaveError> {
        let ignore_file = project_root.join(IGNORE_FILE_NAME);
        let mut builder = GitignoreBuilder::new(project_root);
        if ignore_file.is_file() {
            if let Some(err) = builder.add(&ignore_file) {
                return Err(DocweaveError::Custom(format!(
                    "Could not parse ignore file {}: {err}",
                    ignore_file.display()
                )));
            }
        } else {
            tracing::debug!(
                "No {IGNORE_FILE_NAME} at {}, ignoring nothing",
                project_root.display()
            );
        }
        let matcher = builder
            .build()
            .map_err(|err| DocweaveError::Custom(format!("Could not build ignorer: {err}")))?;
        Ok(GitignoreIgnorer { matcher })
    }
}

impl PathIgnorer for GitignoreIgnorer {
    fn should_ignore(&self, rel: &ProjectRelPath, is_dir: bool) -> bool {
        self.matcher
            .matched_path_or_any_parents(rel.as_path(), is_dir)
            .is_ignore()
    }
}

/// Ignorer that excludes nothing.
pub struct AllowAll;

impl PathIgnorer for AllowAll {
    fn should_ignore(&self, _rel: &ProjectRelPath, _is_dir: bool) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_ignore_file_ignores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ignorer = GitignoreIgnorer::from_project_root(dir.path()).unwrap();
        assert!(!ignorer.should_ignore(&ProjectRelPath::new("a/b.go"), false));
    }

    #[test]
    fn patterns_exclude_files_and_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(IGNORE_FILE_NAME), "vendor/\n*.min.js\n").unwrap();
        let ignorer = GitignoreIgnorer::from_project_root(dir.path()).unwrap();

        assert!(ignorer.should_ignore(&ProjectRelPath::new("vendor"), true));
        assert!(ignorer.should_ignore(&ProjectRelPath::new("vendor/dep/mod.go"), false));
        assert!(ignorer.should_ignore(&ProjectRelPath::new("app.min.js"), false));
        assert!(!ignorer.should_ignore(&ProjectRelPath::new("app.js"), false));
    }
}
