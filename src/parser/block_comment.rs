use crate::{
    error::DocweaveError,
    parser::{indent_columns, leading_whitespace, CommentParser, ParsedComment},
};

/// Parser for delimited comment blocks (`/* @docweave … @docweave */`).
///
/// Opens on `<open-token> <marker>`, closes on `<marker> <close-token>`;
/// interior lines are taken verbatim apart from outer whitespace trimming —
/// there is no per-line token to strip.
pub struct BlockCommentParser {
    open: String,
    close: String,
    marker: String,
}

impl BlockCommentParser {
    pub fn new(open: String, close: String, marker: &str) -> Self {
        BlockCommentParser {
            open,
            close,
            marker: marker.to_string(),
        }
    }

    fn is_block_end(&self, line: &str) -> bool {
        let Some(rest) = line.trim().strip_prefix(&self.marker) else {
            return false;
        };
        rest.trim_start().starts_with(&self.close)
    }
}

impl CommentParser for BlockCommentParser {
    fn trigger(&self, line: &str) -> bool {
        let Some(rest) = line.trim().strip_prefix(&self.open) else {
            return false;
        };
        rest.trim_start().starts_with(&self.marker)
    }

    fn parse<'a>(
        &self,
        start_line: &str,
        lines: &mut dyn Iterator<Item = &'a str>,
    ) -> Result<ParsedComment, DocweaveError> {
        let indent = leading_whitespace(start_line, &self.open)?;
        let indent_columns = indent_columns(indent);

        let mut content = String::new();
        for line in lines {
            if self.is_block_end(line) {
                return Ok(ParsedComment {
                    content,
                    indent_columns,
                });
            }
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str(line.trim());
        }
        Err(DocweaveError::UnterminatedBlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> BlockCommentParser {
        BlockCommentParser::new("/*".to_string(), "*/".to_string(), "@docweave")
    }

    #[test]
    fn trigger_and_end_use_their_own_shapes() {
        let p = parser();
        assert!(p.trigger("/* @docweave"));
        assert!(p.trigger("  /*  @docweave"));
        assert!(!p.trigger("// @docweave"));
        assert!(!p.trigger("@docweave */"));
        assert!(p.is_block_end("@docweave */"));
        assert!(p.is_block_end("  @docweave  */"));
        assert!(!p.is_block_end("/* @docweave"));
    }

    #[test]
    fn interior_lines_are_trimmed_only() {
        let p = parser();
        let mut rest = "  Some prose.\n\n  More prose.\n@docweave */\nrest();".lines();
        let parsed = p.parse("/* @docweave", &mut rest).unwrap();
        assert_eq!(parsed.content, "Some prose.\n\nMore prose.");
        assert_eq!(rest.next(), Some("rest();"));
    }

    #[test]
    fn indent_captured_from_opening_line() {
        let p = parser();
        let mut rest = "prose\n@docweave */".lines();
        let parsed = p.parse("\t/* @docweave", &mut rest).unwrap();
        assert_eq!(parsed.indent_columns, crate::config::TAB_COLUMNS);
    }

    #[test]
    fn missing_end_marker_is_unterminated() {
        let p = parser();
        let mut rest = "prose forever".lines();
        assert_eq!(
            p.parse("/* @docweave", &mut rest),
            Err(DocweaveError::UnterminatedBlock)
        );
    }
}
