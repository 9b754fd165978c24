//! Batch rendering of Mermaid (`.mmd`) diagrams into SVG files.

use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::path::{display_relative, has_extension, mirror_path};

pub mod renderer;

pub use renderer::{CommandRenderer, DiagramRenderer};

pub const SOURCE_EXTENSION: &str = "mmd";
pub const OUTPUT_EXTENSION: &str = "svg";

#[derive(Debug, Clone)]
pub struct DiagramRun {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub theme: String,
    /// Re-render diagrams whose SVG already exists
    pub overwrite: bool,
    /// Base directory for paths shown in progress output
    pub display_base: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Rendered,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    pub status: RenderStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub skipped: usize,
}

/// Every `.mmd` file under `root`, sorted by path.
pub fn find_diagram_files(root: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), &[SOURCE_EXTENSION]))
        .map(|entry| entry.into_path())
        .collect()
}

impl DiagramRun {
    pub fn output_path(&self, source: &Path) -> Result<PathBuf> {
        mirror_path(&self.source_root, &self.output_root, source, OUTPUT_EXTENSION)
    }

    pub fn render_file<R: DiagramRenderer + ?Sized>(
        &self,
        renderer: &R,
        source: &Path,
    ) -> Result<RenderOutcome> {
        let output = self.output_path(source)?;
        if !self.overwrite && output.exists() {
            return Ok(RenderOutcome {
                source: source.to_path_buf(),
                output,
                status: RenderStatus::Skipped,
            });
        }

        let mermaid = fs::read_to_string(source)
            .into_diagnostic()
            .with_context(|| format!("Failed to read diagram: {:?}", source))?;

        let svg = renderer
            .render(&mermaid, &self.theme)
            .with_context(|| format!("Failed to render diagram: {:?}", source))?;

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .into_diagnostic()
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        fs::write(&output, svg)
            .into_diagnostic()
            .with_context(|| format!("Failed to write SVG: {:?}", output))?;

        Ok(RenderOutcome {
            source: source.to_path_buf(),
            output,
            status: RenderStatus::Rendered,
        })
    }

    /// Renders every diagram in order, writing progress to `out`. The first
    /// failure stops the run.
    pub fn run<R: DiagramRenderer + ?Sized, W: Write>(
        &self,
        renderer: &R,
        out: &mut W,
    ) -> Result<RenderSummary> {
        let files = find_diagram_files(&self.source_root);
        let mut summary = RenderSummary::default();

        if files.is_empty() {
            writeln!(out, "No .mmd files found under {}", self.source_root.display())
                .into_diagnostic()?;
            return Ok(summary);
        }

        log::debug!(
            "Rendering {} diagrams with theme {}",
            files.len(),
            self.theme
        );

        for (index, source) in files.iter().enumerate() {
            writeln!(
                out,
                "[{}/{}] {}",
                index + 1,
                files.len(),
                self.display(source)
            )
            .into_diagnostic()?;

            let outcome = self.render_file(renderer, source)?;
            match outcome.status {
                RenderStatus::Skipped => {
                    summary.skipped += 1;
                    writeln!(out, "  skipped (exists): {}", self.display(&outcome.output))
                        .into_diagnostic()?;
                }
                RenderStatus::Rendered => {
                    summary.rendered += 1;
                    writeln!(
                        out,
                        "  wrote: {} -> {}",
                        self.display(&outcome.source),
                        self.display(&outcome.output)
                    )
                    .into_diagnostic()?;
                }
            }
        }

        writeln!(out).into_diagnostic()?;
        writeln!(
            out,
            "Done. rendered={} skipped={} mode={}",
            summary.rendered,
            summary.skipped,
            if self.overwrite {
                "overwrite"
            } else {
                "skip-existing"
            }
        )
        .into_diagnostic()?;
        if !self.overwrite {
            writeln!(out, "Use --overwrite (or -f) to replace existing SVG files.")
                .into_diagnostic()?;
        }

        Ok(summary)
    }

    fn display(&self, path: &Path) -> String {
        display_relative(path, &self.display_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::miette;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeRenderer {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl DiagramRenderer for FakeRenderer {
        fn render(&self, source: &str, theme: &str) -> Result<String> {
            self.calls
                .borrow_mut()
                .push((source.to_string(), theme.to_string()));
            Ok(format!("<svg data-theme=\"{theme}\">{source}</svg>"))
        }
    }

    struct FailingRenderer;

    impl DiagramRenderer for FailingRenderer {
        fn render(&self, _source: &str, _theme: &str) -> Result<String> {
            Err(miette!("syntax error in graph"))
        }
    }

    fn setup(files: &[(&str, &str)]) -> (tempfile::TempDir, DiagramRun) {
        let dir = tempfile::tempdir().unwrap();
        let source_root = dir.path().join("src/assets/projects");
        for (name, contents) in files {
            let path = source_root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        let run = DiagramRun {
            source_root,
            output_root: dir.path().join("public/projects"),
            theme: "tokyo-night".to_string(),
            overwrite: false,
            display_base: dir.path().to_path_buf(),
        };
        (dir, run)
    }

    #[test]
    fn test_find_diagram_files_is_sorted_and_filtered() {
        let (_dir, run) = setup(&[
            ("b/flow.mmd", "graph TD;"),
            ("a/system.mmd", "graph LR;"),
            ("a/notes.md", "not a diagram"),
        ]);

        let files = find_diagram_files(&run.source_root);
        assert_eq!(
            files,
            vec![
                run.source_root.join("a/system.mmd"),
                run.source_root.join("b/flow.mmd"),
            ]
        );
    }

    #[test]
    fn test_run_renders_and_reports() {
        let (dir, run) = setup(&[("wedding-ready/feed.mmd", "graph TD; A-->B")]);
        let renderer = FakeRenderer::default();
        let mut out = Vec::new();

        let summary = run.run(&renderer, &mut out).unwrap();

        assert_eq!(summary, RenderSummary { rendered: 1, skipped: 0 });
        let svg = fs::read_to_string(dir.path().join("public/projects/wedding-ready/feed.svg")).unwrap();
        assert_eq!(svg, "<svg data-theme=\"tokyo-night\">graph TD; A-->B</svg>");

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "[1/1] src/assets/projects/wedding-ready/feed.mmd\n\
             \x20 wrote: src/assets/projects/wedding-ready/feed.mmd -> public/projects/wedding-ready/feed.svg\n\
             \n\
             Done. rendered=1 skipped=0 mode=skip-existing\n\
             Use --overwrite (or -f) to replace existing SVG files.\n"
        );
    }

    #[test]
    fn test_existing_output_is_skipped() {
        let (dir, run) = setup(&[("a.mmd", "graph TD;"), ("b.mmd", "graph LR;")]);
        let existing = dir.path().join("public/projects/a.svg");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "old").unwrap();

        let renderer = FakeRenderer::default();
        let summary = run.run(&renderer, &mut Vec::new()).unwrap();

        assert_eq!(summary, RenderSummary { rendered: 1, skipped: 1 });
        assert_eq!(fs::read_to_string(existing).unwrap(), "old");
        assert_eq!(renderer.calls.borrow().len(), 1);
    }

    #[test]
    fn test_overwrite_rerenders_existing_output() {
        let (dir, mut run) = setup(&[("a.mmd", "graph TD;")]);
        let existing = dir.path().join("public/projects/a.svg");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "old").unwrap();
        run.overwrite = true;

        let mut out = Vec::new();
        let summary = run.run(&FakeRenderer::default(), &mut out).unwrap();

        assert_eq!(summary, RenderSummary { rendered: 1, skipped: 0 });
        assert_ne!(fs::read_to_string(existing).unwrap(), "old");
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("mode=overwrite"));
        assert!(!out.contains("Use --overwrite"));
    }

    #[test]
    fn test_no_diagrams_is_not_an_error() {
        let (_dir, run) = setup(&[]);
        let mut out = Vec::new();

        let summary = run.run(&FakeRenderer::default(), &mut out).unwrap();

        assert_eq!(summary, RenderSummary::default());
        assert!(String::from_utf8(out).unwrap().starts_with("No .mmd files found under "));
    }

    #[test]
    fn test_first_failure_stops_the_run() {
        let (dir, run) = setup(&[("a.mmd", "graph TD;"), ("b.mmd", "graph LR;")]);

        let err = run.run(&FailingRenderer, &mut Vec::new()).unwrap_err();

        assert!(err
            .chain()
            .any(|cause| cause.to_string() == "syntax error in graph"));
        assert!(!dir.path().join("public/projects").exists());
    }
}
