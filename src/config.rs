use std::path::PathBuf;

pub const DEFAULT_TARGET_WIDTH: u32 = 256;

/// Parameters for one image-normalization run. Passed explicitly into
/// `process_export`; there is no ambient or file-based configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Pixel width every resized image is normalized to.
    pub target_width: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            target_width: DEFAULT_TARGET_WIDTH,
        }
    }
}

/// Parameters for one metadata-aggregation run.
#[derive(Debug, Clone, Default)]
pub struct AggregateConfig {
    /// When set, the aggregated table is also persisted here as CSV.
    pub csv_path: Option<PathBuf>,
}
