//! # docweave
//!
//! Weave marker-delimited documentation comments and the code around them
//! into a browsable HTML tree.
//!
//! Source files are split into alternating code and comment blocks by
//! [`parser`]; comment blocks are Markdown, rendered by [`page`] with link
//! and image destinations retargeted by [`resolve`] so cross-references keep
//! working inside the generated tree. The [`pipeline`] walks a project root,
//! builds one page per supported source file (mirroring the directory
//! layout), and reconciles stale output. Repeat runs are incremental via the
//! [`cache`] strategies; `.docweaveignore` exclusions are handled by
//! [`ignorer`].
//!
//! The `bin` feature adds the `docweave` command-line front end.

pub mod cache;
pub mod config;
pub mod error;
pub mod ignorer;
pub mod page;
pub mod parser;
pub mod paths;
pub mod pipeline;
pub mod resolve;

pub use error::*;
