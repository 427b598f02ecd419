use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as resizable images, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "heic", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Recognized image to resize and re-encode.
    Image,
    /// JSON sidecar metadata file.
    Sidecar,
    /// Anything else; ignored by every consumer.
    Other,
}

/// One file discovered during traversal, already classified.
#[derive(Debug)]
pub struct FileVisit {
    pub path: PathBuf,
    pub kind: FileKind,
}

pub fn classify(path: &Path) -> FileKind {
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        if IMAGE_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)) {
            return FileKind::Image;
        }
    }

    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if name.ends_with(".json") {
        FileKind::Sidecar
    } else {
        FileKind::Other
    }
}

/// Lazily visit every file below `root`, yielding classified events in walk
/// order. `exclude` prunes one subtree entirely; the image normalizer passes
/// its own output root so a run never revisits what it just wrote.
///
/// Unreadable entries are logged and skipped, not fatal.
pub fn walk_files(root: &Path, exclude: Option<&Path>) -> impl Iterator<Item = FileVisit> {
    let exclude = exclude.map(Path::to_path_buf);

    WalkDir::new(root)
        .into_iter()
        .filter_entry(move |entry| match &exclude {
            Some(pruned) => entry.path() != pruned.as_path(),
            None => true,
        })
        .filter_map(|entry_result| match entry_result {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Failed to access entry during walk: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let path = entry.into_path();
            let kind = classify(&path);
            log::trace!("Discovered file: {:?} ({:?})", path, kind);
            FileVisit { path, kind }
        })
}
