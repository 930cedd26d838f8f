//! The three path kinds docweave distinguishes, and the registry of paths
//! written during a run.
//!
//! Project-root-relative, output-root-relative, and absolute paths are never
//! intermixed: the relative kinds are distinct newtypes, and the only ways to
//! cross between kinds are the documented conversion functions on them.

mod processed;
mod relpath;

pub use processed::ProcessedPaths;
pub use relpath::{OutputRelPath, ProjectRelPath, PAGE_SUFFIX};
