//! Static language configuration: which file extensions docweave understands,
//! which comment syntaxes each language carries, and how the generated page
//! names the language for client-side syntax highlighting.
//!
//! The registry is built once at startup and passed by reference (or `Arc`)
//! into parser selection, link resolution, and the build pipeline. Nothing in
//! here is global or mutable after construction.

use std::collections::BTreeMap;
use std::path::Path;

/// Default marker token. The same token opens and closes a block, so nested
/// blocks are ambiguous and unsupported (see [`crate::parser::split_blocks`]).
pub const DEFAULT_MARKER: &str = "@docweave";

/// Number of columns a tab occupies when measuring block indentation.
pub const TAB_COLUMNS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCommentTokens {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub name: String,
    /// Token opening a single-line comment (`//`, `#`), if the language has one.
    pub line_comment_token: Option<String>,
    pub block_comment: Option<BlockCommentTokens>,
    /// Name highlight.js knows this language by, if any.
    pub highlight_name: Option<String>,
}

/// Extension → language lookup plus the comment-block marker token.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    by_extension: BTreeMap<String, LanguageInfo>,
    marker: String,
}

impl LanguageRegistry {
    pub fn new(by_extension: BTreeMap<String, LanguageInfo>, marker: String) -> Self {
        LanguageRegistry {
            by_extension,
            marker,
        }
    }

    /// The built-in table covering the common C-comment and hash-comment
    /// language families.
    pub fn builtin() -> Self {
        let mut by_extension = BTreeMap::new();

        let c_style = |name: &str, highlight: Option<&str>| LanguageInfo {
            name: name.to_string(),
            line_comment_token: Some("//".to_string()),
            block_comment: Some(BlockCommentTokens {
                open: "/*".to_string(),
                close: "*/".to_string(),
            }),
            highlight_name: highlight.map(str::to_string),
        };
        let hash_style = |name: &str, highlight: Option<&str>| LanguageInfo {
            name: name.to_string(),
            line_comment_token: Some("#".to_string()),
            block_comment: None,
            highlight_name: highlight.map(str::to_string),
        };

        for (ext, info) in [
            ("adb", c_style("ADA", Some("ada"))),
            ("ads", c_style("ADA", Some("ada"))),
            ("c", c_style("C", Some("c"))),
            ("h", c_style("C", Some("c"))),
            ("cs", c_style("C#", Some("csharp"))),
            ("cpp", c_style("C++", Some("c++"))),
            ("hpp", c_style("C++", Some("c++"))),
            ("d", c_style("D", Some("d"))),
            ("go", c_style("Golang", Some("golang"))),
            ("java", c_style("Java", Some("java"))),
            ("js", c_style("JavaScript", Some("js"))),
            ("lua", c_style("Lua", Some("lua"))),
            ("m", c_style("Objective-C", Some("objectivec"))),
            ("pl", c_style("Perl", Some("perl"))),
            ("pm", c_style("Perl", Some("perl"))),
            ("php", c_style("PHP", Some("php"))),
            ("rs", c_style("Rust", Some("rust"))),
            ("scala", c_style("Scala", Some("scala"))),
            ("swift", c_style("Swift", Some("swift"))),
            ("ts", c_style("TypeScript", Some("ts"))),
            ("py", hash_style("Python", Some("python"))),
            ("rb", hash_style("Ruby", Some("ruby"))),
            ("sh", hash_style("Shell", Some("bash"))),
            ("toml", hash_style("TOML", Some("toml"))),
            ("yaml", hash_style("YAML", Some("yaml"))),
            ("yml", hash_style("YAML", Some("yaml"))),
            (
                "txt",
                LanguageInfo {
                    name: "Text".to_string(),
                    line_comment_token: Some("//".to_string()),
                    block_comment: None,
                    highlight_name: None,
                },
            ),
        ] {
            by_extension.insert(ext.to_string(), info);
        }

        LanguageRegistry::new(by_extension, DEFAULT_MARKER.to_string())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn lookup(&self, extension: &str) -> Option<&LanguageInfo> {
        self.by_extension.get(extension)
    }

    pub fn lookup_path(&self, path: &Path) -> Option<&LanguageInfo> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.lookup(ext))
    }

    /// Whether a file at this path would get a generated page of its own.
    pub fn supports(&self, path: &Path) -> bool {
        self.lookup_path(path).is_some()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        LanguageRegistry::builtin()
    }
}
