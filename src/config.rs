use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "portfolio.toml";
pub const DEFAULT_THEME: &str = "tokyo-night";
pub const THEME_ENV_VAR: &str = "MERMAID_THEME";

/// Configuration for the portfolio build tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub content: ContentConfig,
    pub diagrams: DiagramConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Enable debug logging
    pub verbose: bool,
}

/// Case-study build settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding the case-study YAML records
    pub input_dir: PathBuf,
    /// Directory the render-ready JSON is written to
    pub output_dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("content/case-studies"),
            output_dir: PathBuf::from("public/content"),
        }
    }
}

/// Diagram rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub theme: String,
    /// Themes the renderer accepts. Empty means any name is passed through.
    pub themes: Vec<String>,
    pub renderer: RendererConfig,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src/assets/projects"),
            output_root: PathBuf::from("public/projects"),
            theme: DEFAULT_THEME.to_string(),
            themes: Vec::new(),
            renderer: RendererConfig::default(),
        }
    }
}

impl DiagramConfig {
    /// Picks the theme from the command line, then the environment, then this
    /// config.
    pub fn resolve_theme(&self, flag: Option<&str>, env: Option<&str>) -> Result<String> {
        let theme = flag
            .or(env)
            .filter(|theme| !theme.is_empty())
            .unwrap_or(self.theme.as_str());

        if !self.themes.is_empty() && !self.themes.iter().any(|known| known == theme) {
            return Err(miette::miette!(
                "Unknown Mermaid theme \"{}\". Available: {}",
                theme,
                self.themes.join(", ")
            ));
        }

        Ok(theme.to_string())
    }
}

/// External program that turns Mermaid source (stdin) into SVG (stdout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: String,
    /// Arguments; `{theme}` is replaced with the resolved theme
    pub args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "mmdc".to_string(),
            args: ["-i", "-", "-o", "-", "-e", "svg", "-t", "{theme}"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)
            .into_diagnostic()
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).into_diagnostic()
    }

    /// Load configuration from a TOML file, or return defaults if the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            log::info!(
                "Config file not found, using defaults: {:?}",
                path.as_ref()
            );
            return Ok(Self::default());
        }

        Self::from_file(path)
    }
}
