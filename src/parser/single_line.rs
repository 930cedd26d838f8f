use crate::{
    error::DocweaveError,
    parser::{indent_columns, leading_whitespace, CommentParser, ParsedComment},
};

/// Parser for runs of single-line comments (`// @docweave … // @docweave`,
/// `# @docweave … # @docweave`).
///
/// A block opens on a line of the form `<token> <marker>` (after trimming)
/// and closes on the next such line; every interior line has the comment
/// token stripped before the lines are newline-joined.
pub struct SingleLineParser {
    token: String,
    marker: String,
}

impl SingleLineParser {
    pub fn new(token: String, marker: &str) -> Self {
        SingleLineParser {
            token,
            marker: marker.to_string(),
        }
    }

    /// The end marker uses the same token string as the start marker, so
    /// this is intentionally identical to `trigger`.
    fn is_block_end(&self, line: &str) -> bool {
        self.trigger(line)
    }

    fn strip_token<'a>(&self, line: &'a str) -> &'a str {
        let trimmed = line.trim();
        match trimmed.strip_prefix(&self.token) {
            Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
            None => {
                tracing::warn!(
                    "Line inside a comment block does not start with '{}'",
                    self.token
                );
                trimmed
            }
        }
    }
}

impl CommentParser for SingleLineParser {
    fn trigger(&self, line: &str) -> bool {
        let Some(rest) = line.trim().strip_prefix(&self.token) else {
            return false;
        };
        rest.trim_start().starts_with(&self.marker)
    }

    fn parse<'a>(
        &self,
        start_line: &str,
        lines: &mut dyn Iterator<Item = &'a str>,
    ) -> Result<ParsedComment, DocweaveError> {
        let indent = leading_whitespace(start_line, &self.token)?;
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
            content.push_str(self.strip_token(line));
        }
        Err(DocweaveError::UnterminatedBlock)
    }
}
