pub mod aggregator;
pub mod config;
pub mod error;
#[cfg(feature = "heif")]
pub mod heif;
pub mod metadata;
pub mod processor;
pub mod progress;
pub mod walker;

pub use aggregator::aggregate_metadata;
pub use config::{AggregateConfig, ExportConfig, DEFAULT_TARGET_WIDTH};
pub use error::AppError;
pub use metadata::{Extraction, PhotoRecord, SkipReason};
pub use processor::process_export;
pub use progress::ProcessingStats;
