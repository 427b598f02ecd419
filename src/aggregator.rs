use std::path::Path;

use crate::config::AggregateConfig;
use crate::error::AppError;
use crate::metadata::{extract_from_file, Extraction, PhotoRecord};
use crate::walker::{self, FileKind};

pub const CSV_COLUMNS: [&str; 11] = [
    "id",
    "title",
    "file_type",
    "url",
    "description",
    "creation_time",
    "photo_taken_time",
    "latitude",
    "longitude",
    "altitude",
    "people",
];

/// Walk a directory of sidecar files and collect every valid photo record,
/// in walk order. Sidecars for non-photo assets (albums, shared albums) lack
/// the required fields and are skipped transparently. Duplicate ids produce
/// duplicate rows; nothing here enforces uniqueness.
pub fn aggregate_metadata(
    metadata_dir: &Path,
    config: &AggregateConfig,
) -> Result<Vec<PhotoRecord>, AppError> {
    log::info!("Aggregating sidecar metadata in {:?}", metadata_dir);

    let mut records = Vec::new();
    for visit in walker::walk_files(metadata_dir, None) {
        if visit.kind != FileKind::Sidecar {
            continue;
        }
        match extract_from_file(&visit.path) {
            Extraction::Record(record) => records.push(record),
            Extraction::Skipped(reason) => {
                log::debug!("Skipping sidecar {:?}: {:?}", visit.path, reason);
            }
        }
    }

    log::info!("Aggregated {} photo records", records.len());

    if let Some(csv_path) = &config.csv_path {
        write_csv(csv_path, &records)?;
        log::info!("Wrote {:?}", csv_path);
    }

    Ok(records)
}

/// Serialize records as delimited text, id leading, header row first.
/// Absent optionals become empty cells; people are `;`-joined.
pub fn write_csv(path: &Path, records: &[PhotoRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_COLUMNS)?;

    for record in records {
        writer.write_record([
            record.id.clone(),
            record.title.clone(),
            record.file_type.clone(),
            record.url.clone(),
            record.description.clone(),
            record.creation_time.to_rfc3339(),
            record.photo_taken_time.to_rfc3339(),
            optional_cell(record.latitude),
            optional_cell(record.longitude),
            record.altitude.to_string(),
            record
                .people
                .as_ref()
                .map(|people| people.iter().cloned().collect::<Vec<_>>().join(";"))
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
