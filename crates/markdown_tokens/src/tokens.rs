use serde::{Deserialize, Serialize};

use crate::syntax::Node;

pub const DEFAULT_LINK_URL: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedMarkdownContent {
    Empty,
    Plain { text: String },
    Markdown { blocks: Vec<BlockToken> },
}

impl ParsedMarkdownContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, ParsedMarkdownContent::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockToken {
    Paragraph {
        inlines: Vec<InlineToken>,
    },
    Heading {
        depth: HeadingDepth,
        inlines: Vec<InlineToken>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<InlineToken>>,
    },
    Code {
        value: String,
    },
    Hr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineToken {
    Text { value: String },
    Strong { value: String },
    Emphasis { value: String },
    InlineCode { value: String },
    Link { value: String, url: String },
    Delete { value: String },
    Break,
}

/// Heading depth as rendered on the site: `h2` through `h4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct HeadingDepth(u8);

impl HeadingDepth {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 4;

    pub fn clamped(depth: u8) -> Self {
        Self(depth.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for HeadingDepth {
    fn from(depth: u8) -> Self {
        Self::clamped(depth)
    }
}

impl From<HeadingDepth> for u8 {
    fn from(depth: HeadingDepth) -> Self {
        depth.0
    }
}

/// Collapses nested inline structure into a single string. Only text and
/// inline code contribute characters.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    push_plain_text(&mut out, nodes);
    out
}

fn push_plain_text(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::Text(value) | Node::InlineCode(value) => out.push_str(value),
            other => {
                if let Some(children) = other.children() {
                    push_plain_text(out, children);
                }
            }
        }
    }
}

pub fn inline_token(node: &Node) -> Option<InlineToken> {
    match node {
        Node::Text(value) => Some(InlineToken::Text {
            value: value.clone(),
        }),
        Node::Strong(children) => Some(InlineToken::Strong {
            value: plain_text(children),
        }),
        Node::Emphasis(children) => Some(InlineToken::Emphasis {
            value: plain_text(children),
        }),
        Node::InlineCode(value) => Some(InlineToken::InlineCode {
            value: value.clone(),
        }),
        Node::Link { url, children, .. } => Some(InlineToken::Link {
            value: plain_text(children),
            url: if url.is_empty() {
                DEFAULT_LINK_URL.to_string()
            } else {
                url.clone()
            },
        }),
        Node::Delete(children) => Some(InlineToken::Delete {
            value: plain_text(children),
        }),
        Node::Break => Some(InlineToken::Break),
        Node::Paragraph(_)
        | Node::Heading { .. }
        | Node::List { .. }
        | Node::ListItem { .. }
        | Node::Code { .. }
        | Node::ThematicBreak
        | Node::Blockquote(_)
        | Node::Html(_)
        | Node::Table(_)
        | Node::TableRow(_)
        | Node::TableCell(_)
        | Node::FootnoteDefinition { .. }
        | Node::Image { .. }
        | Node::FootnoteReference(_)
        | Node::Unsupported(_) => None,
    }
}

pub fn inline_tokens(nodes: &[Node]) -> Vec<InlineToken> {
    nodes.iter().filter_map(inline_token).collect()
}

/// A list item's paragraph wrapper contributes its inlines directly.
fn list_item_inlines(item: &Node) -> Vec<InlineToken> {
    let Some(children) = item.children() else {
        return Vec::new();
    };

    let mut tokens = Vec::new();
    for child in children {
        match child {
            Node::Paragraph(inlines) => tokens.extend(inline_tokens(inlines)),
            other => tokens.extend(inline_token(other)),
        }
    }

    tokens
}

pub fn block_token(node: &Node) -> Option<BlockToken> {
    match node {
        Node::Paragraph(children) => Some(BlockToken::Paragraph {
            inlines: inline_tokens(children),
        }),
        Node::Heading { depth, children } => Some(BlockToken::Heading {
            depth: HeadingDepth::clamped(*depth),
            inlines: inline_tokens(children),
        }),
        Node::List {
            ordered, children, ..
        } => Some(BlockToken::List {
            ordered: *ordered,
            items: children.iter().map(list_item_inlines).collect(),
        }),
        Node::Code { value, .. } => Some(BlockToken::Code {
            value: value.clone(),
        }),
        Node::ThematicBreak => Some(BlockToken::Hr),
        Node::ListItem { .. }
        | Node::Blockquote(_)
        | Node::Html(_)
        | Node::Table(_)
        | Node::TableRow(_)
        | Node::TableCell(_)
        | Node::FootnoteDefinition { .. }
        | Node::Text(_)
        | Node::Strong(_)
        | Node::Emphasis(_)
        | Node::Delete(_)
        | Node::InlineCode(_)
        | Node::Link { .. }
        | Node::Image { .. }
        | Node::FootnoteReference(_)
        | Node::Break
        | Node::Unsupported(_) => None,
    }
}

pub fn block_tokens(nodes: &[Node]) -> Vec<BlockToken> {
    nodes.iter().filter_map(block_token).collect()
}
