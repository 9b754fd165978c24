use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::tokens::plain_text;

/// Generic markdown syntax tree, shaped after mdast.
///
/// Every construct the grammar reports lands in exactly one variant. Containers
/// without a dedicated variant (definition lists, metadata blocks, ...) become
/// [`Node::Unsupported`] so their text is still reachable when flattening.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Block
    Paragraph(Vec<Node>),
    Heading {
        depth: u8,
        children: Vec<Node>,
    },
    List {
        ordered: bool,
        start: Option<u64>,
        children: Vec<Node>,
    },
    ListItem {
        checked: Option<bool>,
        children: Vec<Node>,
    },
    Code {
        lang: Option<String>,
        value: String,
    },
    ThematicBreak,
    Blockquote(Vec<Node>),
    Html(String),
    Table(Vec<Node>),
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),
    FootnoteDefinition {
        label: String,
        children: Vec<Node>,
    },

    // Inline
    Text(String),
    Strong(Vec<Node>),
    Emphasis(Vec<Node>),
    Delete(Vec<Node>),
    InlineCode(String),
    Link {
        url: String,
        title: String,
        children: Vec<Node>,
    },
    Image {
        url: String,
        alt: String,
    },
    FootnoteReference(String),
    Break,

    Unsupported(Vec<Node>),
}

impl Node {
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Paragraph(children)
            | Node::Heading { children, .. }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Blockquote(children)
            | Node::Table(children)
            | Node::TableRow(children)
            | Node::TableCell(children)
            | Node::FootnoteDefinition { children, .. }
            | Node::Strong(children)
            | Node::Emphasis(children)
            | Node::Delete(children)
            | Node::Link { children, .. }
            | Node::Unsupported(children) => Some(children),
            Node::Code { .. }
            | Node::ThematicBreak
            | Node::Html(_)
            | Node::Text(_)
            | Node::InlineCode(_)
            | Node::Image { .. }
            | Node::FootnoteReference(_)
            | Node::Break => None,
        }
    }

    /// Phrasing content, in mdast terms. Raw HTML counts as inline because the
    /// grammar reports inline HTML and HTML blocks through different events.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Node::Text(_)
                | Node::Strong(_)
                | Node::Emphasis(_)
                | Node::Delete(_)
                | Node::InlineCode(_)
                | Node::Link { .. }
                | Node::Image { .. }
                | Node::FootnoteReference(_)
                | Node::Break
                | Node::Html(_)
        )
    }
}

pub fn markdown_options() -> Options {
    Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Parses `text` with CommonMark plus the GFM extensions and returns the
/// top-level nodes in source order.
pub fn parse_document(text: &str) -> Vec<Node> {
    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(text, markdown_options()) {
        builder.event(event);
    }

    builder.finish()
}

#[derive(Debug)]
enum Open {
    Paragraph,
    Heading(u8),
    List(Option<u64>),
    Item(Option<bool>),
    CodeBlock(Option<String>),
    BlockQuote,
    HtmlBlock,
    Table,
    TableRow,
    TableCell,
    FootnoteDefinition(String),
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String },
    Image { url: String },
    Other,
}

#[derive(Debug)]
struct Frame {
    open: Open,
    children: Vec<Node>,
}

impl Open {
    /// Whether bare URLs in this container's text become links.
    fn links_literals(&self) -> bool {
        !matches!(
            self,
            Open::Link { .. } | Open::Image { .. } | Open::CodeBlock(_) | Open::HtmlBlock
        )
    }
}

impl Frame {
    fn close(self, inside_link: bool) -> Node {
        let Frame { open, children } = self;
        let children = if !inside_link && open.links_literals() {
            link_literals(children)
        } else {
            children
        };

        match open {
            Open::Paragraph => Node::Paragraph(children),
            Open::Heading(depth) => Node::Heading { depth, children },
            Open::List(start) => Node::List {
                ordered: start.is_some(),
                start,
                children,
            },
            Open::Item(checked) => Node::ListItem {
                checked,
                children: wrap_loose_inlines(children),
            },
            Open::CodeBlock(lang) => {
                let mut value = literal_text(&children);
                if value.ends_with('\n') {
                    value.pop();
                }
                Node::Code { lang, value }
            }
            Open::BlockQuote => Node::Blockquote(children),
            Open::HtmlBlock => Node::Html(literal_text(&children)),
            Open::Table => Node::Table(children),
            Open::TableRow => Node::TableRow(children),
            Open::TableCell => Node::TableCell(children),
            Open::FootnoteDefinition(label) => Node::FootnoteDefinition { label, children },
            Open::Emphasis => Node::Emphasis(children),
            Open::Strong => Node::Strong(children),
            Open::Strikethrough => Node::Delete(children),
            Open::Link { url, title } => Node::Link {
                url,
                title,
                children,
            },
            Open::Image { url } => Node::Image {
                url,
                alt: plain_text(&children),
            },
            Open::Other => Node::Unsupported(children),
        }
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.stack.push(Frame {
                open: open_for(tag),
                children: Vec::new(),
            }),
            Event::End(_) => self.close_top(),
            Event::Text(text) => self.push(Node::Text(text.into_string())),
            Event::Code(code) => self.push(Node::InlineCode(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => self.push(Node::Html(html.into_string())),
            Event::FootnoteReference(label) => {
                self.push(Node::FootnoteReference(label.into_string()))
            }
            // mdast keeps soft line endings inside the surrounding text node.
            Event::SoftBreak => self.push(Node::Text("\n".to_string())),
            Event::HardBreak => self.push(Node::Break),
            Event::Rule => self.push(Node::ThematicBreak),
            Event::TaskListMarker(value) => {
                let item = self.stack.iter_mut().rev().find_map(|frame| match &mut frame.open {
                    Open::Item(checked) => Some(checked),
                    _ => None,
                });
                if let Some(checked) = item {
                    *checked = Some(value);
                }
            }
            _ => {}
        }
    }

    fn push(&mut self, node: Node) {
        let children = match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        };
        push_merging_text(children, node);
    }

    fn close_top(&mut self) {
        if let Some(frame) = self.stack.pop() {
            let inside_link = self
                .stack
                .iter()
                .any(|frame| matches!(frame.open, Open::Link { .. } | Open::Image { .. }));
            let node = frame.close(inside_link);
            self.push(node);
        }
    }

    fn finish(mut self) -> Vec<Node> {
        // The event stream is balanced; this only matters for a truncated one.
        while !self.stack.is_empty() {
            self.close_top();
        }

        self.root
    }
}

fn open_for(tag: Tag<'_>) -> Open {
    match tag {
        Tag::Paragraph => Open::Paragraph,
        Tag::Heading { level, .. } => Open::Heading(level as u8),
        Tag::BlockQuote(..) => Open::BlockQuote,
        Tag::CodeBlock(kind) => Open::CodeBlock(match kind {
            CodeBlockKind::Fenced(info) => info
                .split_whitespace()
                .next()
                .map(|lang| lang.to_string()),
            CodeBlockKind::Indented => None,
        }),
        Tag::HtmlBlock => Open::HtmlBlock,
        Tag::List(start) => Open::List(start),
        Tag::Item => Open::Item(None),
        Tag::FootnoteDefinition(label) => Open::FootnoteDefinition(label.into_string()),
        Tag::Table(_) => Open::Table,
        Tag::TableHead | Tag::TableRow => Open::TableRow,
        Tag::TableCell => Open::TableCell,
        Tag::Emphasis => Open::Emphasis,
        Tag::Strong => Open::Strong,
        Tag::Strikethrough => Open::Strikethrough,
        Tag::Link {
            dest_url, title, ..
        } => Open::Link {
            url: dest_url.into_string(),
            title: title.into_string(),
        },
        Tag::Image { dest_url, .. } => Open::Image {
            url: dest_url.into_string(),
        },
        _ => Open::Other,
    }
}

fn push_merging_text(children: &mut Vec<Node>, node: Node) {
    if let Node::Text(text) = &node {
        if let Some(Node::Text(last)) = children.last_mut() {
            last.push_str(text);
            return;
        }
    }

    children.push(node);
}

/// Tight list items carry their inline content directly; mdast always wraps it
/// in a paragraph.
fn wrap_loose_inlines(children: Vec<Node>) -> Vec<Node> {
    let mut wrapped = Vec::with_capacity(children.len());
    let mut run = Vec::new();

    for child in children {
        if child.is_inline() {
            run.push(child);
            continue;
        }

        if !run.is_empty() {
            wrapped.push(Node::Paragraph(std::mem::take(&mut run)));
        }
        wrapped.push(child);
    }

    if !run.is_empty() {
        wrapped.push(Node::Paragraph(run));
    }

    wrapped
}

/// GFM autolink literals: `http://`, `https://` and `www.` URLs written as
/// plain text become links. Runs on merged text, so a URL is never split
/// across nodes.
fn link_literals(children: Vec<Node>) -> Vec<Node> {
    let mut linked = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Node::Text(text) => split_link_literals(&text, &mut linked),
            other => linked.push(other),
        }
    }

    linked
}

fn split_link_literals(text: &str, out: &mut Vec<Node>) {
    let mut copied = 0;
    let mut search = 0;

    while let Some(offset) = text[search..].find(['h', 'H', 'w', 'W']) {
        let start = search + offset;
        let Some((len, url)) = link_literal_at(text, start) else {
            search = start + 1;
            continue;
        };

        if start > copied {
            out.push(Node::Text(text[copied..start].to_string()));
        }
        out.push(Node::Link {
            url,
            title: String::new(),
            children: vec![Node::Text(text[start..start + len].to_string())],
        });
        copied = start + len;
        search = copied;
    }

    if copied < text.len() {
        out.push(Node::Text(text[copied..].to_string()));
    }
}

/// Length and destination of the URL literal starting at `start`, if any.
fn link_literal_at(text: &str, start: usize) -> Option<(usize, String)> {
    let boundary = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| c.is_whitespace() || matches!(c, '*' | '_' | '~' | '('));
    if !boundary {
        return None;
    }

    let rest = &text[start..];
    let (domain_start, scheme) = if starts_with_ignore_case(rest, "https://") {
        (8, "")
    } else if starts_with_ignore_case(rest, "http://") {
        (7, "")
    } else if starts_with_ignore_case(rest, "www.") {
        (0, "http://")
    } else {
        return None;
    };

    let after_scheme = &rest[domain_start..];
    let domain_len = after_scheme
        .find(|c: char| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(after_scheme.len());
    if !is_valid_domain(&after_scheme[..domain_len]) {
        return None;
    }

    let end = rest
        .find(|c: char| c.is_whitespace() || c == '<')
        .unwrap_or(rest.len());
    let literal = trim_link_literal(&rest[..end]);
    if literal.len() <= domain_start {
        return None;
    }

    Some((literal.len(), format!("{scheme}{literal}")))
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// At least one period, no empty segments, no underscores in the last two.
fn is_valid_domain(domain: &str) -> bool {
    let segments: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
    segments.len() >= 2
        && segments.iter().all(|segment| !segment.is_empty())
        && segments
            .iter()
            .rev()
            .take(2)
            .all(|segment| !segment.contains('_'))
}

fn trim_link_literal(mut literal: &str) -> &str {
    while let Some(last) = literal.chars().next_back() {
        let unbalanced_paren =
            last == ')' && literal.matches(')').count() > literal.matches('(').count();
        if !unbalanced_paren && !matches!(last, '?' | '!' | '.' | ',' | ':' | '*' | '_' | '~') {
            break;
        }
        literal = &literal[..literal.len() - 1];
    }

    literal
}

fn literal_text(children: &[Node]) -> String {
    children
        .iter()
        .filter_map(|child| match child {
            Node::Text(text) | Node::Html(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
