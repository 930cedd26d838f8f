//! Per-file HTML page assembly.
//!
//! A page is the file's ordered [`Block`] sequence: code blocks are
//! HTML-escaped and fenced for client-side highlighting, comment blocks are
//! rendered from Markdown (after link resolution) into an indented `<div>`
//! so prose lines up with the code it documents.

use std::fmt::Write;

use pulldown_cmark::{CowStr, Event as MdEvent, Options, Parser as MdParser, Tag as MdTag};

use crate::{
    config::LanguageInfo,
    error::DocweaveError,
    parser::{parsers_for, split_blocks, Block},
    resolve::LinkResolver,
};

fn md_options() -> Options {
    let mut options = Options::empty();
    // Enabled explicitly rather than via all() for better reproduceability.
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one comment block's Markdown to HTML, rewriting every link and
/// image destination through `resolver` before conversion.
pub(crate) fn render_markdown(content: &str, resolver: &LinkResolver<'_>) -> String {
    let events = MdParser::new_ext(content, md_options()).map(|event| match event {
        MdEvent::Start(MdTag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = match resolver.resolve(&dest_url) {
                Some(updated) => CowStr::from(updated),
                None => dest_url,
            };
            MdEvent::Start(MdTag::Link {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        MdEvent::Start(MdTag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = match resolver.resolve(&dest_url) {
                Some(updated) => CowStr::from(updated),
                None => dest_url,
            };
            MdEvent::Start(MdTag::Image {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        other => other,
    });
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events);
    html
}

/// Build the whole generated page for one source file.
pub fn render_document(
    source: &str,
    info: &LanguageInfo,
    marker: &str,
    resolver: &LinkResolver<'_>,
) -> Result<String, DocweaveError> {
    let parsers = parsers_for(info, marker);
    let blocks = split_blocks(source, &parsers)?;

    let mut page = String::new();
    page.push_str(concat!(
        "<!DOCTYPE html>\n",
        "<html>\n",
        "<head>\n",
        "<link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.11.1/styles/default.min.css\">\n",
        "<script src=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.11.1/highlight.min.js\"></script>\n",
        "<style>pre {tab-size: 4ch;}</style>\n",
        "</head>\n",
        "<body>\n",
    ));

    for block in &blocks {
        match block {
            Block::Code { content } => {
                if content.chars().all(char::is_whitespace) {
                    continue;
                }
                let escaped = escape_html(content);
                match &info.highlight_name {
                    Some(name) => writeln!(
                        page,
                        "<pre><code class=\"language-{name}\">{escaped}</code></pre>"
                    )?,
                    None => writeln!(page, "<pre><code>{escaped}</code></pre>")?,
                }
            }
            Block::Comment {
                content,
                indent_columns,
            } => {
                let rendered = render_markdown(content, resolver);
                writeln!(
                    page,
                    "<div style=\"padding-left: calc({indent_columns}ch + 1em); font-size:12px;\">{rendered}</div>"
                )?;
            }
        }
    }

    page.push_str("<script>hljs.highlightAll();</script>\n</body>\n</html>\n");
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LanguageRegistry, ignorer::AllowAll};
    use std::path::Path;
    use test_log::test;

    fn test_resolver(registry: &LanguageRegistry) -> LinkResolver<'_> {
        LinkResolver::new(
            Path::new("/project"),
            Path::new("/project/a/b.go"),
            Path::new("/project/docs"),
            Path::new("/project/docs/a/b.go.html"),
            registry,
            &AllowAll,
        )
    }

    #[test]
    fn plain_file_renders_one_escaped_code_block() {
        let registry = LanguageRegistry::builtin();
        let resolver = test_resolver(&registry);
        let info = registry.lookup("go").unwrap();
        let page =
            render_document("if a < b && c > d {}\n", info, registry.marker(), &resolver).unwrap();

        assert!(page.contains(
            "<pre><code class=\"language-golang\">if a &lt; b &amp;&amp; c &gt; d {}</code></pre>"
        ));
        assert_eq!(page.matches("<pre><code").count(), 1);
        assert!(page.contains("hljs.highlightAll()"));
    }

    #[test]
    fn comment_block_renders_as_indented_markdown() {
        let registry = LanguageRegistry::builtin();
        let resolver = test_resolver(&registry);
        let info = registry.lookup("go").unwrap();
        let source = "\t// @docweave\n\t// *hello*\n\t// @docweave\nfunc f() {}\n";
        let page = render_document(source, info, registry.marker(), &resolver).unwrap();

        assert!(page.contains("padding-left: calc(4ch + 1em)"));
        assert!(page.contains("<em>hello</em>"));
        // Comment precedes code, matching source order.
        let comment_at = page.find("<em>hello</em>").unwrap();
        let code_at = page.find("func f() {}").unwrap();
        assert!(comment_at < code_at);
    }

    #[test]
    fn whitespace_only_code_blocks_are_skipped() {
        let registry = LanguageRegistry::builtin();
        let resolver = test_resolver(&registry);
        let info = registry.lookup("go").unwrap();
        let source = "// @docweave\n// one\n// @docweave\n\n\n// @docweave\n// two\n// @docweave\n";
        let page = render_document(source, info, registry.marker(), &resolver).unwrap();
        assert!(!page.contains("<pre><code"));
    }

    #[test]
    fn unterminated_block_fails_the_document() {
        let registry = LanguageRegistry::builtin();
        let resolver = test_resolver(&registry);
        let info = registry.lookup("go").unwrap();
        let result = render_document("// @docweave\n// open\n", info, registry.marker(), &resolver);
        assert_eq!(result, Err(DocweaveError::UnterminatedBlock));
    }

    #[test]
    fn links_in_comments_are_rewritten() {
        let registry = LanguageRegistry::builtin();
        let resolver = test_resolver(&registry);
        let info = registry.lookup("go").unwrap();
        let source = "// @docweave\n// See [util](../lib/util.go) and ![cat](images/cat.png)\n// @docweave\n";
        let page = render_document(source, info, registry.marker(), &resolver).unwrap();
        assert!(page.contains("href=\"../lib/util.go.html\""));
        assert!(page.contains("src=\"../a/images/cat.png\""));
    }
}
