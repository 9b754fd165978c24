use markdown_tokens::{MarkdownValue, ParsedMarkdownContent};
use serde::{Deserialize, Serialize};

use super::{
    Architecture, CaseStudy, CodeLanguage, ConstraintDecisionRow, ContentBlock, CssVariable,
    DeepDive, Engineering, ImageAsset, ProblemSolution, RenderedCaseStudy,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderedBlock {
    #[serde(rename = "md")]
    Markdown { content: ParsedMarkdownContent },
    #[serde(rename = "ul")]
    List { items: Vec<ParsedMarkdownContent> },
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

/// What gets written per case study: the rendered record plus its theme as
/// CSS custom properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudyPage {
    #[serde(flatten)]
    pub case_study: RenderedCaseStudy,
    pub css_variables: Vec<CssVariable>,
}

fn parse(value: &MarkdownValue) -> ParsedMarkdownContent {
    value.parse()
}

impl ContentBlock {
    pub fn render(&self) -> RenderedBlock {
        match self {
            // An `md` block is itself a markdown-tagged value.
            ContentBlock::Markdown { text } => RenderedBlock::Markdown {
                content: MarkdownValue::markdown(text.as_str()).parse(),
            },
            ContentBlock::List { items } => RenderedBlock::List {
                items: items.iter().map(parse).collect(),
            },
            ContentBlock::H2 { text } => RenderedBlock::H2 { text: text.clone() },
            ContentBlock::H3 { text } => RenderedBlock::H3 { text: text.clone() },
            ContentBlock::Paragraph { text } => RenderedBlock::Paragraph { text: text.clone() },
            ContentBlock::Callout { title, text } => RenderedBlock::Callout {
                title: title.clone(),
                text: text.clone(),
            },
            ContentBlock::Code { language, code } => RenderedBlock::Code {
                language: *language,
                code: code.clone(),
            },
            ContentBlock::Image(image) => RenderedBlock::Image(image.clone()),
        }
    }
}

impl CaseStudy {
    pub fn render(&self) -> RenderedCaseStudy {
        let problem_solution = &self.problem_solution;
        let architecture = &self.architecture;

        CaseStudy {
            slug: self.slug.clone(),
            name: self.name.clone(),
            logo: self.logo.clone(),
            excerpt: self.excerpt.clone(),
            hero_image: self.hero_image.clone(),
            live_url: self.live_url.clone(),
            repo_url: self.repo_url.clone(),
            one_liner: self.one_liner.clone(),
            roles: self.roles.clone(),
            tech_stack: self.tech_stack.iter().map(parse).collect(),
            problem_solution: ProblemSolution {
                problem: parse(&problem_solution.problem),
                solution: parse(&problem_solution.solution),
                technical_why: problem_solution.technical_why.as_ref().map(parse),
            },
            architecture: Architecture {
                diagram: architecture.diagram.clone(),
                flow_note: architecture.flow_note.as_ref().map(parse),
                content: architecture.content.iter().map(ContentBlock::render).collect(),
            },
            engineering: Engineering {
                caption: self.engineering.caption.clone(),
                rows: self
                    .engineering
                    .rows
                    .iter()
                    .map(|row| ConstraintDecisionRow {
                        constraint: parse(&row.constraint),
                        decision: parse(&row.decision),
                        trade_off: parse(&row.trade_off),
                    })
                    .collect(),
            },
            deep_dive: DeepDive {
                title: self.deep_dive.title.clone(),
                content: self.deep_dive.content.iter().map(ContentBlock::render).collect(),
            },
            theme: self.theme.clone(),
        }
    }

    pub fn render_page(&self) -> CaseStudyPage {
        CaseStudyPage {
            case_study: self.render(),
            css_variables: self.theme.css_variables(),
        }
    }
}
