use common::{compare, paragraph, text};
use markdown_tokens::{BlockToken, HeadingDepth, InlineToken};

mod common;

fn strong(value: &str) -> InlineToken {
    InlineToken::Strong {
        value: value.to_string(),
    }
}

fn emphasis(value: &str) -> InlineToken {
    InlineToken::Emphasis {
        value: value.to_string(),
    }
}

#[test]
fn test_inline_order_is_preserved() {
    compare(
        "**a** and *b*",
        vec![paragraph(vec![strong("a"), text(" and "), emphasis("b")])],
    );
}

#[test]
fn test_nested_formatting_collapses_into_strong() {
    compare(
        "**bold *and* italic**",
        vec![paragraph(vec![strong("bold and italic")])],
    );
}

#[test]
fn test_link_without_url_defaults_to_hash() {
    compare(
        "[text]()",
        vec![paragraph(vec![InlineToken::Link {
            value: "text".to_string(),
            url: "#".to_string(),
        }])],
    );
}

#[test]
fn test_link_flattens_display_text() {
    compare(
        "see [**the** repo](https://github.com/example/repo)",
        vec![paragraph(vec![
            text("see "),
            InlineToken::Link {
                value: "the repo".to_string(),
                url: "https://github.com/example/repo".to_string(),
            },
        ])],
    );
}

#[test]
fn test_bare_urls_become_links() {
    compare(
        "see https://example.com now, or www.example.org.",
        vec![paragraph(vec![
            text("see "),
            InlineToken::Link {
                value: "https://example.com".to_string(),
                url: "https://example.com".to_string(),
            },
            text(" now, or "),
            InlineToken::Link {
                value: "www.example.org".to_string(),
                url: "http://www.example.org".to_string(),
            },
            text("."),
        ])],
    );
}

#[test]
fn test_inline_code_and_strikethrough() {
    compare(
        "run `cargo test` ~~twice~~",
        vec![paragraph(vec![
            text("run "),
            InlineToken::InlineCode {
                value: "cargo test".to_string(),
            },
            text(" "),
            InlineToken::Delete {
                value: "twice".to_string(),
            },
        ])],
    );
}

#[test]
fn test_soft_break_is_part_of_text() {
    compare("one\ntwo", vec![paragraph(vec![text("one\ntwo")])]);
}

#[test]
fn test_hard_break() {
    compare(
        "one  \ntwo",
        vec![paragraph(vec![text("one"), InlineToken::Break, text("two")])],
    );
}

#[test]
fn test_unmatched_delimiter_stays_one_text() {
    compare("a * b", vec![paragraph(vec![text("a * b")])]);
}

#[test]
fn test_list_item_paragraph_is_unwrapped() {
    compare(
        "- hello",
        vec![BlockToken::List {
            ordered: false,
            items: vec![vec![text("hello")]],
        }],
    );
}

#[test]
fn test_ordered_list() {
    compare(
        "1. **Proxy gate:** auth first\n2. render",
        vec![BlockToken::List {
            ordered: true,
            items: vec![
                vec![strong("Proxy gate:"), text(" auth first")],
                vec![text("render")],
            ],
        }],
    );
}

#[test]
fn test_loose_list_item_concatenates_paragraphs() {
    compare(
        "- a\n\n  b",
        vec![BlockToken::List {
            ordered: false,
            items: vec![vec![text("a"), text("b")]],
        }],
    );
}

#[test]
fn test_nested_list_is_dropped_from_item() {
    compare(
        "- outer\n  - inner",
        vec![BlockToken::List {
            ordered: false,
            items: vec![vec![text("outer")]],
        }],
    );
}

#[test]
fn test_heading_depth_is_clamped() {
    compare(
        "# Top\n\n###### Deep",
        vec![
            BlockToken::Heading {
                depth: HeadingDepth::clamped(2),
                inlines: vec![text("Top")],
            },
            BlockToken::Heading {
                depth: HeadingDepth::clamped(4),
                inlines: vec![text("Deep")],
            },
        ],
    );
}

#[test]
fn test_code_block_discards_language() {
    compare(
        "```ts\nconst a = 1;\nconst b = 2;\n```",
        vec![BlockToken::Code {
            value: "const a = 1;\nconst b = 2;".to_string(),
        }],
    );
}

#[test]
fn test_thematic_break_between_paragraphs() {
    compare(
        "above\n\n---\n\nbelow",
        vec![
            paragraph(vec![text("above")]),
            BlockToken::Hr,
            paragraph(vec![text("below")]),
        ],
    );
}

#[test]
fn test_image_is_dropped_from_paragraph() {
    compare("![diagram](/system.svg)", vec![paragraph(vec![])]);
}

#[test]
fn test_table_and_blockquote_are_dropped() {
    compare(
        "intro\n\n| a | b |\n| - | - |\n| 1 | 2 |\n\n> quoted\n\noutro",
        vec![paragraph(vec![text("intro")]), paragraph(vec![text("outro")])],
    );
}

#[test]
fn test_inline_html_is_dropped() {
    compare(
        "a <span>b</span> c",
        vec![paragraph(vec![text("a "), text("b"), text(" c")])],
    );
}

#[test]
fn test_only_unknown_blocks_yield_no_blocks() {
    compare("> just a quote", vec![]);
}
