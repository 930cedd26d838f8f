//! docweave CLI tool
//!
//! Builds a browsable HTML documentation tree from a project's source files,
//! extracting `@docweave` comment blocks and interleaving them with the code.

use clap::Parser;
use docweave::{
    cache::{init_cache, CacheMode, DEFAULT_CACHE_FILE_NAME},
    config::LanguageRegistry,
    ignorer::GitignoreIgnorer,
    pipeline::BuildPipeline,
};
use std::{fs, path::PathBuf, sync::Arc};

#[derive(Parser)]
#[command(name = "docweave")]
#[command(author, version, about = "Weave documentation comments and code into an HTML tree", long_about = None)]
struct Cli {
    /// Root of the project tree to document
    project_root: PathBuf,

    /// Directory receiving the generated tree (created if absent)
    output_dir: PathBuf,

    /// Build cache file [default: <project-root>/.docweave_cache.json]
    cache_file: Option<PathBuf>,

    /// Cache strategy for skipping up-to-date files
    #[arg(long, value_enum, default_value = "modtime")]
    cache: CacheMode,

    /// Rebuild every file, but still refresh the cache for later runs
    #[arg(long)]
    force_rebuild: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    fs::create_dir_all(&cli.output_dir)?;
    let project_root = std::path::absolute(&cli.project_root)?;
    let output_root = std::path::absolute(&cli.output_dir)?;
    let cache_file = std::path::absolute(
        cli.cache_file
            .unwrap_or_else(|| project_root.join(DEFAULT_CACHE_FILE_NAME)),
    )?;

    let cache = init_cache(
        cli.cache,
        cli.force_rebuild,
        project_root.clone(),
        output_root.clone(),
        cache_file,
    );
    let ignorer = Arc::new(GitignoreIgnorer::from_project_root(&project_root)?);
    let registry = Arc::new(LanguageRegistry::builtin());
    let pipeline = BuildPipeline::new(registry, cache, ignorer);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(pipeline.run(&project_root, &output_root))?;

    tracing::info!("Generated documentation at {}", output_root.display());
    Ok(())
}
