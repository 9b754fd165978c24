//! Build-time tooling for the portfolio site: case-study content conversion
//! and Mermaid diagram rendering.

pub mod config;
pub mod content;
pub mod diagrams;
pub mod path;

pub use config::Config;
pub use markdown_tokens;
