//! Comment-block extraction: turns a source file's line stream into an
//! ordered sequence of alternating [`Block::Code`] and [`Block::Comment`]
//! segments.
//!
//! One parser exists per comment style valid for the file's language. For
//! every line not already inside a block, parsers are tried in a fixed
//! priority order; the first whose `trigger` matches consumes the block.
//!
//! The start and end markers are the same token, so nested blocks are
//! ambiguous and unsupported: an inner "start" line is consumed as the outer
//! block's end. This is a documented limitation, not something the parsers
//! try to repair.

mod block_comment;
mod single_line;

pub use block_comment::BlockCommentParser;
pub use single_line::SingleLineParser;

use crate::{
    config::{LanguageInfo, TAB_COLUMNS},
    error::DocweaveError,
};

/// One segment of a parsed source file, in source line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Code {
        content: String,
    },
    Comment {
        /// Raw Markdown text, newline-joined, marker and comment tokens
        /// stripped.
        content: String,
        /// Column width of the opening line's leading whitespace; controls
        /// the rendered fragment's visual indent.
        indent_columns: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedComment {
    pub content: String,
    pub indent_columns: usize,
}

pub trait CommentParser: Send + Sync {
    /// Whether `line` opens a comment block in this style.
    fn trigger(&self, line: &str) -> bool;

    /// Consume the block opened by `start_line`. Precondition:
    /// `trigger(start_line)` was true.
    ///
    /// Returns [`DocweaveError::UnterminatedBlock`] if the end marker is
    /// never found (this consumes the rest of `lines`). Any other error is
    /// reported before a single interior line has been consumed, so the
    /// caller can safely demote the trigger line to code.
    fn parse<'a>(
        &self,
        start_line: &str,
        lines: &mut dyn Iterator<Item = &'a str>,
    ) -> Result<ParsedComment, DocweaveError>;
}

/// Measure leading whitespace in column-equivalents (tab = [`TAB_COLUMNS`]).
pub(crate) fn indent_columns(leading: &str) -> usize {
    leading
        .chars()
        .map(|c| if c == '\t' { TAB_COLUMNS } else { 1 })
        .sum()
}

/// Extract the leading whitespace before `token` on a block-opening line.
/// Errors if the token is absent or preceded by anything but whitespace —
/// which the trigger precondition should rule out, so this is the parsers'
/// soft failure path.
pub(crate) fn leading_whitespace<'a>(
    line: &'a str,
    token: &str,
) -> Result<&'a str, DocweaveError> {
    let idx = line.find(token).ok_or_else(|| {
        DocweaveError::Parse(format!("Line does not contain the comment token '{token}'"))
    })?;
    let leading = &line[..idx];
    if leading.chars().any(|c| !c.is_whitespace()) {
        return Err(DocweaveError::Parse(format!(
            "Comment token '{token}' is preceded by non-whitespace"
        )));
    }
    Ok(leading)
}

/// The parsers valid for `info`, in trigger priority order.
pub fn parsers_for(info: &LanguageInfo, marker: &str) -> Vec<Box<dyn CommentParser>> {
    let mut parsers: Vec<Box<dyn CommentParser>> = Vec::new();
    if let Some(token) = &info.line_comment_token {
        parsers.push(Box::new(SingleLineParser::new(token.clone(), marker)));
    }
    if let Some(tokens) = &info.block_comment {
        parsers.push(Box::new(BlockCommentParser::new(
            tokens.open.clone(),
            tokens.close.clone(),
            marker,
        )));
    }
    parsers
}

/// Split a whole source file into blocks.
///
/// An unterminated comment block fails the whole file; a parser that
/// triggers but then errors for another reason is demoted to code and the
/// scan continues.
pub fn split_blocks(
    source: &str,
    parsers: &[Box<dyn CommentParser>],
) -> Result<Vec<Block>, DocweaveError> {
    let mut blocks = Vec::new();
    let mut code: Option<String> = None;
    let mut lines = source.lines();

    fn push_code(code: &mut Option<String>, line: &str) {
        match code {
            Some(content) => {
                content.push('\n');
                content.push_str(line);
            }
            None => *code = Some(line.to_string()),
        }
    }

    while let Some(line) = lines.next() {
        let Some(parser) = parsers.iter().find(|p| p.trigger(line)) else {
            push_code(&mut code, line);
            continue;
        };
        match parser.parse(line, &mut lines) {
            Ok(parsed) => {
                if let Some(content) = code.take() {
                    blocks.push(Block::Code { content });
                }
                blocks.push(Block::Comment {
                    content: parsed.content,
                    indent_columns: parsed.indent_columns,
                });
            }
            Err(DocweaveError::UnterminatedBlock) => return Err(DocweaveError::UnterminatedBlock),
            Err(err) => {
                tracing::warn!("Comment block trigger did not parse cleanly: {err}, treating the line as code");
                push_code(&mut code, line);
            }
        }
    }
    if let Some(content) = code.take() {
        blocks.push(Block::Code { content });
    }
    Ok(blocks)
}
