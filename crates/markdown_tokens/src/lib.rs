//! Converts markdown-capable content fields into render tokens.
//!
//! A field is either plain text, passed through untouched, or a record tagged
//! `type: md` whose text is parsed (CommonMark + GFM) and reduced to a closed
//! set of block and inline tokens. Constructs outside that set are dropped.

pub mod syntax;
pub mod tokens;
pub mod value;

pub use syntax::{parse_document, Node};
pub use tokens::{BlockToken, HeadingDepth, InlineToken, ParsedMarkdownContent};
pub use value::{null_as_empty, MarkdownValue, TaggedText, MARKDOWN_TAG};

/// Converts an optional content field. `None` is the same as empty text.
pub fn parse_markdown_value(value: Option<&MarkdownValue>) -> ParsedMarkdownContent {
    let Some(value) = value else {
        return ParsedMarkdownContent::Empty;
    };

    let text = value.text();
    if text.is_empty() {
        return ParsedMarkdownContent::Empty;
    }

    if !value.is_markdown() {
        return ParsedMarkdownContent::Plain {
            text: text.to_string(),
        };
    }

    ParsedMarkdownContent::Markdown {
        blocks: markdown_blocks(text),
    }
}

/// Parses `text` as markdown unconditionally.
pub fn markdown_blocks(text: &str) -> Vec<BlockToken> {
    tokens::block_tokens(&parse_document(text))
}

impl MarkdownValue {
    pub fn parse(&self) -> ParsedMarkdownContent {
        parse_markdown_value(Some(self))
    }
}
