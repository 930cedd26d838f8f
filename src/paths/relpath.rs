use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf, MAIN_SEPARATOR_STR},
};

use crate::error::DocweaveError;

/// Suffix appended to a source file's mirrored path to name its generated
/// page: `a/b.go` → `a/b.go.html`.
pub const PAGE_SUFFIX: &str = ".html";

/// Normalize any forward-slash separators to the platform form. All stored
/// relative paths are kept in platform form; forward-slash form only appears
/// in rendered Markdown/HTML output.
fn to_platform_form(path: PathBuf) -> PathBuf {
    if MAIN_SEPARATOR_STR == "/" {
        return path;
    }
    match path.to_str() {
        Some(s) => PathBuf::from(s.replace('/', MAIN_SEPARATOR_STR)),
        None => path,
    }
}

/// A path relative to the project root (the tree being documented).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectRelPath(PathBuf);

impl ProjectRelPath {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        ProjectRelPath(to_platform_form(path.into()))
    }

    /// Strip the project root off an absolute path. Fails if `abs` does not
    /// lie under `project_root`.
    pub fn from_absolute(project_root: &Path, abs: &Path) -> Result<Self, DocweaveError> {
        Ok(ProjectRelPath::new(abs.strip_prefix(project_root)?))
    }

    pub fn to_absolute(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.0)
    }

    /// The absolute path of the generated page mirroring this source file
    /// under `output_root`, with [`PAGE_SUFFIX`] appended.
    pub fn output_page_path(&self, output_root: &Path) -> PathBuf {
        let mut os = output_root.join(&self.0).into_os_string();
        os.push(PAGE_SUFFIX);
        PathBuf::from(os)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl Display for ProjectRelPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A path relative to the output root (the generated doc tree).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputRelPath(PathBuf);

impl OutputRelPath {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        OutputRelPath(to_platform_form(path.into()))
    }

    /// Strip the output root off an absolute path. Fails if `abs` does not
    /// lie under `output_root`.
    pub fn from_absolute(output_root: &Path, abs: &Path) -> Result<Self, DocweaveError> {
        Ok(OutputRelPath::new(abs.strip_prefix(output_root)?))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl Display for OutputRelPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
