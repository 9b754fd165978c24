use miette::{miette, IntoDiagnostic, Result, WrapErr};
use std::io::Write;
use std::process::{Command, Stdio};

use crate::config::RendererConfig;

const THEME_PLACEHOLDER: &str = "{theme}";

pub trait DiagramRenderer {
    /// Turns Mermaid source into an SVG document.
    fn render(&self, source: &str, theme: &str) -> Result<String>;
}

/// Pipes the diagram source through an external program.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    fn command(&self, theme: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.args.iter().map(|arg| arg.replace(THEME_PLACEHOLDER, theme)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl DiagramRenderer for CommandRenderer {
    fn render(&self, source: &str, theme: &str) -> Result<String> {
        let mut child = self
            .command(theme)
            .spawn()
            .into_diagnostic()
            .with_context(|| format!("Failed to start renderer `{}`", self.program))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| miette!("Renderer `{}` has no stdin", self.program))?;
        let input = source.to_string();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .into_diagnostic()
            .with_context(|| format!("Renderer `{}` did not finish", self.program))?;

        let written = writer
            .join()
            .map_err(|_| miette!("Writing to renderer `{}` panicked", self.program))?;

        // A failing renderer may close stdin early; its exit status explains more.
        if !output.status.success() {
            return Err(miette!(
                "Renderer `{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        written
            .into_diagnostic()
            .with_context(|| format!("Failed to write diagram source to `{}`", self.program))?;

        String::from_utf8(output.stdout)
            .into_diagnostic()
            .with_context(|| format!("Renderer `{}` produced invalid UTF-8", self.program))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_command_renderer_pipes_source() {
        let renderer = CommandRenderer::new("cat", vec![]);
        let svg = renderer.render("graph TD; A-->B", "tokyo-night").unwrap();
        assert_eq!(svg, "graph TD; A-->B");
    }

    #[test]
    fn test_command_renderer_substitutes_theme() {
        let renderer = CommandRenderer::new(
            "sh",
            vec!["-c".to_string(), "cat >/dev/null; printf '%s' \"$0\"".to_string(), "{theme}".to_string()],
        );
        assert_eq!(renderer.render("graph TD;", "nord").unwrap(), "nord");
    }

    #[test]
    fn test_command_renderer_reports_failure() {
        let renderer = CommandRenderer::new(
            "sh",
            vec!["-c".to_string(), "cat >/dev/null; echo broken >&2; exit 3".to_string()],
        );
        let err = renderer.render("graph TD;", "nord").unwrap_err();
        assert!(err.to_string().contains("broken"), "{err:?}");
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let renderer = CommandRenderer::new("definitely-not-a-renderer-binary", vec![]);
        assert!(renderer.render("graph TD;", "nord").is_err());
    }
}
