//! Case-study records and their render-ready form.
//!
//! Records are generic over the markdown field type `M` and the content block
//! type `B`: authored files deserialize into [`CaseStudy`], and rendering
//! produces a [`RenderedCaseStudy`] with the same shape. Defaults on generic
//! fields name their constructor so serde does not demand `M: Default`.

use markdown_tokens::{MarkdownValue, ParsedMarkdownContent};
use serde::{Deserialize, Serialize};

pub mod build;
pub mod render;

pub use build::{build_content, discover_records, load_case_study, BuildSummary};
pub use render::{CaseStudyPage, RenderedBlock};

pub type RenderedCaseStudy = CaseStudy<ParsedMarkdownContent, RenderedBlock>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    Ts,
    Js,
    Sql,
    Bash,
    Txt,
}

/// Authored block inside an architecture or deep-dive section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "md")]
    Markdown {
        #[serde(default, deserialize_with = "markdown_tokens::null_as_empty")]
        text: String,
    },
    #[serde(rename = "ul")]
    List { items: Vec<MarkdownValue> },
    #[serde(rename = "h2")]
    H2 { text: String },
    #[serde(rename = "h3")]
    H3 { text: String },
    #[serde(rename = "p")]
    Paragraph { text: String },
    #[serde(rename = "callout")]
    Callout {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: String,
    },
    #[serde(rename = "code")]
    Code { language: CodeLanguage, code: String },
    #[serde(rename = "image")]
    Image(ImageAsset),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSolution<M> {
    pub problem: M,
    pub solution: M,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_why: Option<M>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Architecture<M, B> {
    pub diagram: ImageAsset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_note: Option<M>,
    #[serde(default = "Vec::new")]
    pub content: Vec<B>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintDecisionRow<M> {
    pub constraint: M,
    pub decision: M,
    pub trade_off: M,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engineering<M> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default = "Vec::new")]
    pub rows: Vec<ConstraintDecisionRow<M>>,
}

impl<M> Default for Engineering<M> {
    fn default() -> Self {
        Self {
            caption: None,
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDive<B> {
    #[serde(default)]
    pub title: String,
    #[serde(default = "Vec::new")]
    pub content: Vec<B>,
}

impl<B> Default for DeepDive<B> {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: Vec::new(),
        }
    }
}

// These map directly to CSS custom properties on project sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyTheme {
    pub brand_bg: String,
    pub index_bg: String,
    pub description_bg: String,
    pub image_bg: String,
    pub image_frame_bg: String,
    pub brand_text: String,
    pub index_text: String,
    pub description_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_muted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssVariable {
    pub name: String,
    pub value: String,
}

impl CaseStudyTheme {
    pub fn css_variables(&self) -> Vec<CssVariable> {
        let mut pairs = vec![
            ("--brand-bg", &self.brand_bg),
            ("--index-bg", &self.index_bg),
            ("--description-bg", &self.description_bg),
            ("--image-bg", &self.image_bg),
            ("--image-frame-bg", &self.image_frame_bg),
            ("--brand-text", &self.brand_text),
            ("--index-text", &self.index_text),
            ("--description-text", &self.description_text),
        ];
        if let Some(muted) = &self.description_muted {
            pairs.push(("--description-muted", muted));
        }

        pairs
            .into_iter()
            .map(|(name, value)| CssVariable {
                name: name.to_string(),
                value: value.clone(),
            })
            .collect()
    }
}

/// Minimal shape needed for index/home cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyPreview {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageAsset>,
    pub excerpt: String,
    pub hero_image: ImageAsset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy<M = MarkdownValue, B = ContentBlock> {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageAsset>,
    pub excerpt: String,
    pub hero_image: ImageAsset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    pub one_liner: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default = "Vec::new")]
    pub tech_stack: Vec<M>,
    pub problem_solution: ProblemSolution<M>,
    pub architecture: Architecture<M, B>,
    #[serde(default = "Engineering::default")]
    pub engineering: Engineering<M>,
    #[serde(default = "DeepDive::default")]
    pub deep_dive: DeepDive<B>,
    pub theme: CaseStudyTheme,
}

impl<M, B> CaseStudy<M, B> {
    pub fn preview(&self) -> CaseStudyPreview {
        CaseStudyPreview {
            slug: self.slug.clone(),
            name: self.name.clone(),
            logo: self.logo.clone(),
            excerpt: self.excerpt.clone(),
            hero_image: self.hero_image.clone(),
        }
    }
}
