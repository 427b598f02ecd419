use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "heif")]
    #[error("HEIF error: {0}")]
    Heif(#[from] libheif_rs::HeifError),

    #[error("Output directory already exists: {}", .0.display())]
    OutputDirExists(std::path::PathBuf),

    #[error("Generic error: {0}")]
    Generic(String),
}
