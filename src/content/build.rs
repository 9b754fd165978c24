use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{CaseStudy, CaseStudyPreview};
use crate::path::has_extension;

pub const RECORD_EXTENSIONS: &[&str] = &["yaml", "yml"];
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub written: Vec<PathBuf>,
}

/// Case-study record files under `dir`, sorted by file name.
pub fn discover_records(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), RECORD_EXTENSIONS))
        .map(|entry| entry.into_path())
        .collect()
}

pub fn load_case_study(path: &Path) -> Result<CaseStudy> {
    let contents = fs::read_to_string(path)
        .into_diagnostic()
        .with_context(|| format!("Failed to read case study: {:?}", path))?;

    serde_yaml::from_str(&contents)
        .into_diagnostic()
        .with_context(|| format!("Failed to parse case study: {:?}", path))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .into_diagnostic()
        .with_context(|| format!("Failed to serialize {:?}", path))?;

    fs::write(path, json + "\n")
        .into_diagnostic()
        .with_context(|| format!("Failed to write {:?}", path))
}

/// Renders every case study under `input_dir` into `<slug>.json` files plus an
/// `index.json` of previews, in discovery order.
pub fn build_content(input_dir: &Path, output_dir: &Path) -> Result<BuildSummary> {
    if !input_dir.is_dir() {
        return Err(miette!("Content directory does not exist: {:?}", input_dir));
    }

    let mut studies = Vec::new();
    let mut slugs = HashSet::new();
    for path in discover_records(input_dir) {
        log::debug!("Loading case study {:?}", path);
        let study = load_case_study(&path)?;

        if !slugs.insert(study.slug.clone()) {
            return Err(miette!(
                "Duplicate case study slug \"{}\" in {:?}",
                study.slug,
                path
            ));
        }
        studies.push(study);
    }

    fs::create_dir_all(output_dir)
        .into_diagnostic()
        .with_context(|| format!("Failed to create directory: {:?}", output_dir))?;

    let mut summary = BuildSummary::default();
    for study in &studies {
        let path = output_dir.join(format!("{}.json", study.slug));
        write_json(&path, &study.render_page())?;
        log::info!("Wrote {:?}", path);
        summary.written.push(path);
    }

    let previews: Vec<CaseStudyPreview> = studies.iter().map(CaseStudy::preview).collect();
    let index = output_dir.join(INDEX_FILE);
    write_json(&index, &previews)?;
    summary.written.push(index);

    log::info!(
        "Built {} case studies into {:?}",
        studies.len(),
        output_dir
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::WEDDING_READY;
    use serde_json::Value;

    fn write_record(dir: &Path, name: &str, contents: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_build_writes_pages_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("content");
        let output = dir.path().join("public/content");
        write_record(&input, "wedding-ready.yaml", WEDDING_READY);
        write_record(&input, "notes.txt", "ignored");

        let summary = build_content(&input, &output).unwrap();

        assert_eq!(
            summary.written,
            vec![output.join("wedding-ready.json"), output.join(INDEX_FILE)]
        );

        let page: Value =
            serde_json::from_str(&fs::read_to_string(output.join("wedding-ready.json")).unwrap())
                .unwrap();
        assert_eq!(page["techStack"][0]["kind"], "markdown");
        assert_eq!(page["techStack"][1]["kind"], "plain");

        let index: Value =
            serde_json::from_str(&fs::read_to_string(output.join(INDEX_FILE)).unwrap()).unwrap();
        assert_eq!(index[0]["slug"], "wedding-ready");
        assert_eq!(index[0]["heroImage"]["alt"], "Wedding Ready project preview");
    }

    #[test]
    fn test_duplicate_slug_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("content");
        write_record(&input, "a.yaml", WEDDING_READY);
        write_record(&input, "b.yml", WEDDING_READY);

        let err = build_content(&input, &dir.path().join("out")).unwrap_err();

        assert!(err.to_string().contains("Duplicate case study slug"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_invalid_record_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("content");
        write_record(&input, "broken.yaml", "slug: [unterminated");

        let err = build_content(&input, &dir.path().join("out")).unwrap_err();

        assert!(err.to_string().contains("broken.yaml"), "{err:?}");
    }

    #[test]
    fn test_missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(build_content(&dir.path().join("missing"), dir.path()).is_err());
    }

    #[test]
    fn test_discover_records_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "b.yml", "");
        write_record(dir.path(), "a.yaml", "");
        write_record(dir.path(), "c.json", "");

        assert_eq!(
            discover_records(dir.path()),
            vec![dir.path().join("a.yaml"), dir.path().join("b.yml")]
        );
    }
}
