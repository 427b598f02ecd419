use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageError};

use crate::config::ExportConfig;
use crate::error::AppError;
use crate::progress::{ProcessingStats, ProgressReporter, VisitOutcome};
use crate::walker::{self, FileKind};

pub const OUTPUT_DIR_NAME: &str = "preprocessed";
pub const IMAGES_SUBDIR: &str = "images";
pub const METADATA_SUBDIR: &str = "metadata";
const OUTPUT_EXTENSION: &str = "jpeg";

/// Normalize one export tree: resize every recognized image into
/// `preprocessed/images` and copy every JSON sidecar into
/// `preprocessed/metadata`, both flat. The output root must not already
/// exist; this is a one-shot operation with no merge semantics.
///
/// Per-image failures are counted and logged, not fatal.
pub fn process_export(
    export_dir: &Path,
    config: &ExportConfig,
) -> Result<ProcessingStats, AppError> {
    let out_dir = export_dir.join(OUTPUT_DIR_NAME);
    if out_dir.exists() {
        return Err(AppError::OutputDirExists(out_dir));
    }
    fs::create_dir(&out_dir)?;
    let images_dir = out_dir.join(IMAGES_SUBDIR);
    let metadata_dir = out_dir.join(METADATA_SUBDIR);
    fs::create_dir(&images_dir)?;
    fs::create_dir(&metadata_dir)?;

    log::info!("Processing {:?}...", export_dir);

    let mut reporter = ProgressReporter::new();
    let mut written_images = HashSet::new();
    let mut written_metadata = HashSet::new();

    for visit in walker::walk_files(export_dir, Some(&out_dir)) {
        let outcome = match visit.kind {
            FileKind::Image => {
                match resize_and_save(
                    &visit.path,
                    &images_dir,
                    config.target_width,
                    &mut written_images,
                ) {
                    Ok(()) => VisitOutcome::Resized,
                    Err(err) => {
                        log::warn!("Failed to process image {:?}: {}", visit.path, err);
                        VisitOutcome::Failed
                    }
                }
            }
            FileKind::Sidecar => {
                copy_sidecar(&visit.path, &metadata_dir, &mut written_metadata)?;
                VisitOutcome::SidecarCopied
            }
            FileKind::Other => VisitOutcome::Ignored,
        };
        reporter.record(outcome);
    }

    let stats = reporter.into_stats();
    log::info!(
        "Done: {} files seen, {} images resized, {} metadata files copied, {} failed",
        stats.total_files,
        stats.images,
        stats.metadata_files,
        stats.failed
    );
    Ok(stats)
}

/// floor(height × target_width / width), in exact integer arithmetic.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    ((height as u64 * target_width as u64) / width as u64) as u32
}

fn resize_and_save(
    path: &Path,
    images_dir: &Path,
    target_width: u32,
    written: &mut HashSet<PathBuf>,
) -> Result<(), AppError> {
    let img = open_image(path)?;
    let height = scaled_height(img.width(), img.height(), target_width);
    let resized = img.resize_exact(target_width, height, FilterType::Lanczos3);

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let out_path = images_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION));
    warn_on_collision(&out_path, path, written);

    // JPEG cannot represent alpha or exotic pixel modes.
    resized.to_rgb8().save(&out_path)?;
    log::debug!("Resized {:?} -> {:?}", path, out_path);
    Ok(())
}

fn copy_sidecar(
    path: &Path,
    metadata_dir: &Path,
    written: &mut HashSet<PathBuf>,
) -> Result<(), AppError> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let out_path = metadata_dir.join(name);
    warn_on_collision(&out_path, path, written);
    fs::copy(path, &out_path)?;
    log::debug!("Copied sidecar {:?} -> {:?}", path, out_path);
    Ok(())
}

/// Flat output collapses same-named files from different subtrees. Report
/// the collision, then overwrite.
fn warn_on_collision(out_path: &Path, source: &Path, written: &mut HashSet<PathBuf>) {
    if !written.insert(out_path.to_path_buf()) {
        log::warn!(
            "Output name collision, overwriting {:?} (source {:?})",
            out_path,
            source
        );
    }
}

fn open_image(path: &Path) -> Result<DynamicImage, AppError> {
    match image::open(path) {
        Ok(img) => Ok(img),
        Err(ImageError::Unsupported(err)) => {
            // Some HEIC files saved through the photo service decode fine
            // with the primary decoder, so classification never routes on
            // extension; the fallback only runs when the container is
            // actually rejected.
            log::debug!(
                "Primary decode rejected {:?} ({}), trying HEIF fallback",
                path,
                err
            );
            decode_fallback(path, ImageError::Unsupported(err))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(feature = "heif")]
fn decode_fallback(path: &Path, _primary: ImageError) -> Result<DynamicImage, AppError> {
    crate::heif::decode(path)
}

#[cfg(not(feature = "heif"))]
fn decode_fallback(_path: &Path, primary: ImageError) -> Result<DynamicImage, AppError> {
    Err(primary.into())
}
