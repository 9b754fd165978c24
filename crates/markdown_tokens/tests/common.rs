use markdown_tokens::{BlockToken, InlineToken, MarkdownValue, ParsedMarkdownContent};

pub(crate) fn text(value: &str) -> InlineToken {
    InlineToken::Text {
        value: value.to_string(),
    }
}

pub(crate) fn paragraph(inlines: Vec<InlineToken>) -> BlockToken {
    BlockToken::Paragraph { inlines }
}

/// Parses `input` as a markdown-tagged value and checks the resulting blocks.
pub(crate) fn compare(input: &str, expected: Vec<BlockToken>) {
    match MarkdownValue::markdown(input).parse() {
        ParsedMarkdownContent::Markdown { blocks } => assert_eq!(blocks, expected, "input: {input:?}"),
        other => panic!("expected markdown content for {input:?}, got {other:?}"),
    }
}
