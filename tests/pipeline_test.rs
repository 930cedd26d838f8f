//! End-to-end build pipeline tests
//!
//! These tests run full builds against real temporary directories and verify
//! the generated tree, incremental-cache skips, and stale-output
//! reconciliation.

use docweave::{
    cache::{init_cache, CacheMode},
    config::LanguageRegistry,
    ignorer::GitignoreIgnorer,
    pipeline::BuildPipeline,
};
use filetime::{set_file_mtime, FileTime};
use std::{fs, path::Path, sync::Arc};
use tempfile::TempDir;
use test_log::test;

fn write_go_file(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn documented_go_source() -> &'static str {
    "package main\n\n// @docweave\n// # Overview\n//\n// Some *documented* code.\n// @docweave\nfunc main() {}\n"
}

/// Run one full build with the given cache setup.
fn run_build(project_root: &Path, output_root: &Path, mode: CacheMode, force_rebuild: bool) {
    fs::create_dir_all(output_root).unwrap();
    let cache_file = project_root.join(".docweave_cache.json");
    let cache = init_cache(
        mode,
        force_rebuild,
        project_root.to_path_buf(),
        output_root.to_path_buf(),
        cache_file,
    );
    let ignorer = Arc::new(GitignoreIgnorer::from_project_root(project_root).unwrap());
    let registry = Arc::new(LanguageRegistry::builtin());
    let pipeline = BuildPipeline::new(registry, cache, ignorer);

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(pipeline.run(project_root, output_root)).unwrap();
}

#[test]
fn build_mirrors_project_tree() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = temp_dir.path().join("docs");

    write_go_file(&project.join("a/main.go"), documented_go_source());
    write_go_file(
        &project.join("lib/util.py"),
        "x = 1\n# @docweave\n# Helper module.\n# @docweave\ny = 2\n",
    );
    // Unsupported files get no page.
    fs::write(project.join("a/cat.png"), [0u8, 1, 2]).unwrap();

    run_build(&project, &output, CacheMode::Hash, false);

    let main_page = fs::read_to_string(output.join("a/main.go.html")).unwrap();
    assert!(main_page.contains("<em>documented</em>"));
    assert!(main_page.contains("language-golang"));
    assert!(main_page.contains("func main() {}"));

    let util_page = fs::read_to_string(output.join("lib/util.py.html")).unwrap();
    assert!(util_page.contains("Helper module."));

    assert!(!output.join("a/cat.png.html").exists());
    assert!(!output.join("a/cat.png").exists());
}

#[test]
fn output_root_inside_project_is_not_walked() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = project.join("docs");

    write_go_file(&project.join("main.go"), documented_go_source());
    run_build(&project, &output, CacheMode::Hash, false);
    run_build(&project, &output, CacheMode::Hash, false);

    // No page-of-a-page.
    assert!(output.join("main.go.html").exists());
    assert!(!output.join("docs").exists());
}

#[test]
fn unchanged_second_run_leaves_output_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = temp_dir.path().join("docs");

    write_go_file(&project.join("a/main.go"), documented_go_source());
    run_build(&project, &output, CacheMode::Hash, false);

    let page = output.join("a/main.go.html");
    let first = fs::read_to_string(&page).unwrap();
    // Age the page so a rewrite would be visible in its mtime. A content
    // hash does not care about timestamps, so the skip must survive this.
    set_file_mtime(&page, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    run_build(&project, &output, CacheMode::Hash, false);

    assert_eq!(fs::read_to_string(&page).unwrap(), first);
    let meta = fs::metadata(&page).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta).seconds(), 1_000_000);
}

#[test]
fn deleted_output_is_regenerated() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = temp_dir.path().join("docs");

    write_go_file(&project.join("a/main.go"), documented_go_source());
    run_build(&project, &output, CacheMode::Modtime, false);

    let page = output.join("a/main.go.html");
    fs::remove_file(&page).unwrap();
    run_build(&project, &output, CacheMode::Modtime, false);
    assert!(page.exists());
}

#[test]
fn removed_source_output_is_reconciled() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = temp_dir.path().join("docs");

    write_go_file(&project.join("a/main.go"), documented_go_source());
    write_go_file(&project.join("b/extra.go"), documented_go_source());
    run_build(&project, &output, CacheMode::Hash, false);
    assert!(output.join("b/extra.go.html").exists());

    fs::remove_file(project.join("b/extra.go")).unwrap();
    run_build(&project, &output, CacheMode::Hash, false);

    assert!(!output.join("b/extra.go.html").exists());
    assert!(!output.join("b").exists());
    // The untouched (and cache-skipped) file keeps its page.
    assert!(output.join("a/main.go.html").exists());
}

#[test]
fn unterminated_block_fails_only_that_file() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = temp_dir.path().join("docs");

    write_go_file(&project.join("good.go"), documented_go_source());
    write_go_file(
        &project.join("bad.go"),
        "// @docweave\n// never closed\nfunc broken() {}\n",
    );

    run_build(&project, &output, CacheMode::None, false);

    assert!(output.join("good.go.html").exists());
    assert!(!output.join("bad.go.html").exists());
}

#[test]
fn ignored_directory_is_pruned() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = temp_dir.path().join("docs");

    write_go_file(&project.join("main.go"), documented_go_source());
    write_go_file(&project.join("vendor/dep.go"), documented_go_source());
    fs::write(project.join(".docweaveignore"), "vendor/\n").unwrap();

    run_build(&project, &output, CacheMode::Hash, false);

    assert!(output.join("main.go.html").exists());
    assert!(!output.join("vendor").exists());
}

#[test]
fn newly_ignored_output_is_reconciled_away() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = temp_dir.path().join("docs");

    write_go_file(&project.join("main.go"), documented_go_source());
    write_go_file(&project.join("vendor/dep.go"), documented_go_source());
    run_build(&project, &output, CacheMode::Hash, false);
    assert!(output.join("vendor/dep.go.html").exists());

    fs::write(project.join(".docweaveignore"), "vendor/\n").unwrap();
    run_build(&project, &output, CacheMode::Hash, false);

    assert!(!output.join("vendor").exists());
    assert!(output.join("main.go.html").exists());
}

#[test]
fn force_rebuild_rewrites_current_pages() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let output = temp_dir.path().join("docs");

    write_go_file(&project.join("a/main.go"), documented_go_source());
    run_build(&project, &output, CacheMode::Hash, false);

    let page = output.join("a/main.go.html");
    set_file_mtime(&page, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    run_build(&project, &output, CacheMode::Hash, true);

    let meta = fs::metadata(&page).unwrap();
    assert_ne!(FileTime::from_last_modification_time(&meta).seconds(), 1_000_000);
}
