use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::error::SlideshowResult;

const IMAGE_SUFFIXES: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// List the image files in `dir`, sorted lexicographically by file name.
///
/// The suffix match is case-sensitive (`.JPG` is not recognized) and the sort
/// is plain byte order, not a natural/numeric sort: the resulting order
/// defines slideshow adjacency, so `"10.png"` sorts before `"2.png"`.
/// Subdirectories are not descended into. An empty result is not an error;
/// the caller decides whether that aborts the run.
pub fn list_image_files(dir: &Path) -> SlideshowResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read image folder '{}'", dir.display()))?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read entry in folder '{}'", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if IMAGE_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            names.push(name);
        }
    }

    names.sort_unstable();
    Ok(names.into_iter().map(|n| dir.join(n)).collect())
}
