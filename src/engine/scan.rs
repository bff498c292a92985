// Turn CLI inputs (files or directories) into file mappings

use super::plan::FileMapping;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Video file extensions picked up when scanning a directory
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "webm", "mov", "avi", "flv", "m4v", "wmv"];

/// Check if a path has a video file extension
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Scan a directory recursively for video files, sorted by path
pub fn scan(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to scan directory: {}", root.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && is_video_file(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Build one mapping per input video.
///
/// Without `dest` outputs go next to each source. With `dest`, a file input
/// writes into `dest` directly and a directory input keeps its sub-directory
/// layout under `dest`.
pub fn build_mappings(inputs: &[PathBuf], dest: Option<&Path>) -> Result<Vec<FileMapping>> {
    let mut mappings = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for file in scan(input)? {
                let parent = file.parent().unwrap_or(input);
                let destination_dir = match (dest, parent.strip_prefix(input)) {
                    (Some(dest), Ok(rel)) if !rel.as_os_str().is_empty() => dest.join(rel),
                    (Some(dest), _) => dest.to_path_buf(),
                    (None, _) => parent.to_path_buf(),
                };
                mappings.push(FileMapping::new(file.clone(), destination_dir));
            }
        } else if input.is_file() {
            let destination_dir = match dest {
                Some(dest) => dest.to_path_buf(),
                None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
            };
            mappings.push(FileMapping::new(input.clone(), destination_dir));
        } else {
            anyhow::bail!("Input not found: {}", input.display());
        }
    }

    Ok(mappings)
}
