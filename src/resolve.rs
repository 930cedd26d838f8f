//! Link and image path resolution.
//!
//! Documentation authors write ordinary project-relative Markdown links and
//! images; this module retargets each destination so it still resolves from
//! the generated page's location, wherever the output tree is deployed.
//!
//! Per destination, a three-way classification:
//! 1. absolute URLs are left untouched;
//! 2. targets outside the project root become paths relative to the current
//!    output file's directory;
//! 3. targets inside the project root either point at the target's own
//!    generated page (when the target is a supported, non-ignored source
//!    file) relative to the current output file's directory, or — for assets
//!    that get no page — at the original file, relative to the output root,
//!    since assets are referenced in place rather than copied.
//!
//! Any failure computing a relative path logs and leaves the destination
//! unmodified: a broken link in the rendered page, never a build failure.

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::{config::LanguageRegistry, ignorer::PathIgnorer, paths::ProjectRelPath};

/// Resolve `.` and `..` components lexically, without touching the
/// filesystem. Leading `..` components of a relative path are preserved.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(c) => out.push(c),
        }
    }
    out
}

/// Relative path from the directory `from_dir` to `to`. Both must be
/// absolute. `None` when they share no common ancestor (possible across
/// drive prefixes).
pub(crate) fn relative_path(from_dir: &Path, to: &Path) -> Option<PathBuf> {
    if !from_dir.is_absolute() || !to.is_absolute() {
        return None;
    }
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = to.components().collect();
    let mut common = 0;
    while common < from.len() && common < to.len() && from[common] == to[common] {
        common += 1;
    }
    if common == 0 {
        return None;
    }
    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for comp in &to[common..] {
        out.push(comp.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    Some(out)
}

/// Render a path with forward slashes for Markdown/URL output, regardless of
/// the host OS.
pub(crate) fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Destination rewriter for one rendered comment block.
pub struct LinkResolver<'a> {
    project_root: &'a Path,
    source_abs: &'a Path,
    output_root: &'a Path,
    output_abs: &'a Path,
    registry: &'a LanguageRegistry,
    ignorer: &'a dyn PathIgnorer,
}

impl<'a> LinkResolver<'a> {
    pub fn new(
        project_root: &'a Path,
        source_abs: &'a Path,
        output_root: &'a Path,
        output_abs: &'a Path,
        registry: &'a LanguageRegistry,
        ignorer: &'a dyn PathIgnorer,
    ) -> Self {
        LinkResolver {
            project_root,
            source_abs,
            output_root,
            output_abs,
            registry,
            ignorer,
        }
    }

    /// Rewritten destination, or `None` to leave the original untouched.
    pub fn resolve(&self, dest: &str) -> Option<String> {
        if dest.is_empty() || Url::parse(dest).is_ok() {
            // Absolute URL with a scheme (or nothing at all to rewrite).
            return None;
        }

        let dest_path = Path::new(dest);
        let abs = if dest_path.is_absolute() {
            tracing::warn!("Absolute filesystem destination '{dest}' is fragile, using as-is");
            dest_path.to_path_buf()
        } else {
            self.source_abs.parent()?.join(dest_path)
        };
        let abs = normalize_lexically(&abs);

        let output_dir = self.output_abs.parent()?;

        if !abs.starts_with(self.project_root) {
            // Outside the project: the page must still find the target from
            // wherever the doc tree is deployed.
            return self.relative_or_keep(output_dir, &abs, dest);
        }

        let rel = match ProjectRelPath::from_absolute(self.project_root, &abs) {
            Ok(rel) => rel,
            Err(err) => {
                tracing::warn!("Could not relativize destination '{dest}': {err}");
                return None;
            }
        };

        if self.registry.supports(&abs) && !self.ignorer.should_ignore(&rel, false) {
            // The target produces a generated page of its own; point at it.
            let page = rel.output_page_path(self.output_root);
            self.relative_or_keep(output_dir, &page, dest)
        } else {
            // Unprocessed asset: referenced in place inside the original
            // project tree, addressed from the output root downward.
            self.relative_or_keep(self.output_root, &abs, dest)
        }
    }

    fn relative_or_keep(&self, from_dir: &Path, to: &Path, dest: &str) -> Option<String> {
        match relative_path(from_dir, to) {
            Some(rel) => Some(to_forward_slashes(&rel)),
            None => {
                tracing::warn!(
                    "No relative path from {} to {}, keeping destination '{dest}'",
                    from_dir.display(),
                    to.display()
                );
                None
            }
        }
    }
}
