use serde::{Deserialize, Deserializer, Serialize};

/// Discriminator value that marks a tagged record as markdown.
pub const MARKDOWN_TAG: &str = "md";

/// A content field that is either a bare string or a tagged record.
///
/// ```yaml
/// solution: Plain sentence, rendered as-is.
/// decision:
///   type: md
///   text: "**Bold** lead-in and the rest"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkdownValue {
    Plain(String),
    Tagged(TaggedText),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedText {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Older records tag with `format`; only read when `type` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Reads an optional string, treating an explicit `null` (YAML `text:` or
/// `text: ~`) the same as a missing field.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl TaggedText {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: Some(MARKDOWN_TAG.to_string()),
            format: None,
        }
    }

    /// `type` wins whenever it is present, even if `format` disagrees.
    pub fn discriminator(&self) -> Option<&str> {
        self.kind.as_deref().or(self.format.as_deref())
    }

    pub fn is_markdown(&self) -> bool {
        self.discriminator() == Some(MARKDOWN_TAG)
    }
}

impl MarkdownValue {
    pub fn markdown(text: impl Into<String>) -> Self {
        MarkdownValue::Tagged(TaggedText::markdown(text))
    }

    pub fn text(&self) -> &str {
        match self {
            MarkdownValue::Plain(text) => text,
            MarkdownValue::Tagged(tagged) => &tagged.text,
        }
    }

    pub fn is_markdown(&self) -> bool {
        match self {
            MarkdownValue::Plain(_) => false,
            MarkdownValue::Tagged(tagged) => tagged.is_markdown(),
        }
    }
}

impl From<&str> for MarkdownValue {
    fn from(text: &str) -> Self {
        MarkdownValue::Plain(text.to_string())
    }
}

impl From<String> for MarkdownValue {
    fn from(text: String) -> Self {
        MarkdownValue::Plain(text)
    }
}

impl From<TaggedText> for MarkdownValue {
    fn from(tagged: TaggedText) -> Self {
        MarkdownValue::Tagged(tagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(kind: Option<&str>, format: Option<&str>) -> TaggedText {
        TaggedText {
            text: "x".to_string(),
            kind: kind.map(str::to_string),
            format: format.map(str::to_string),
        }
    }

    #[test]
    fn test_discriminator_precedence() {
        assert!(tagged(Some("md"), None).is_markdown());
        assert!(tagged(None, Some("md")).is_markdown());
        assert!(tagged(Some("md"), Some("text")).is_markdown());
        assert!(!tagged(Some("text"), Some("md")).is_markdown());
        assert!(!tagged(None, None).is_markdown());
    }

    #[test]
    fn test_plain_string_is_never_markdown() {
        assert!(!MarkdownValue::from("md").is_markdown());
    }
}
