use miette::{miette, Result};
use std::path::{Path, PathBuf};

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Mirrors `source` from under `source_root` into `output_root`, swapping the
/// extension for `extension`.
pub fn mirror_path(
    source_root: &Path,
    output_root: &Path,
    source: &Path,
    extension: &str,
) -> Result<PathBuf> {
    let relative = pathdiff::diff_paths(source, source_root).ok_or_else(|| {
        miette!(
            "Failed to resolve {:?} relative to {:?}",
            source,
            source_root
        )
    })?;

    let mut output = output_root.join(relative);
    output.set_extension(extension);
    Ok(output)
}

/// Path as shown in progress output: relative to `base` when possible.
pub fn display_relative(path: &Path, base: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
