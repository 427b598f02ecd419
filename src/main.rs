use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use takeout_prep::{
    aggregate_metadata, process_export, AggregateConfig, ExportConfig, DEFAULT_TARGET_WIDTH,
};

#[derive(Parser)]
#[command(name = "takeout_prep", about = "Preprocess a photo export archive")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize every image in an export tree and collect its JSON sidecars
    /// into preprocessed/{images,metadata}
    Process {
        /// Export root directory (the "Takeout" folder)
        export_dir: PathBuf,

        /// Target width for resized images
        #[arg(long, default_value_t = DEFAULT_TARGET_WIDTH)]
        width: u32,
    },
    /// Aggregate sidecar metadata files into one table
    Metadata {
        /// Directory of JSON sidecar files
        metadata_dir: PathBuf,

        /// Where to write the aggregated CSV
        #[arg(long, default_value = "photos_metadata.csv")]
        output: PathBuf,

        /// Collect records without persisting a CSV
        #[arg(long)]
        no_save: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Process { export_dir, width } => {
            let config = ExportConfig {
                target_width: width,
            };
            let stats = process_export(&export_dir, &config)?;
            info!(
                "Processed {} files: {} images, {} metadata files, {} failed images",
                stats.total_files, stats.images, stats.metadata_files, stats.failed
            );
        }
        Command::Metadata {
            metadata_dir,
            output,
            no_save,
        } => {
            let config = AggregateConfig {
                csv_path: (!no_save).then_some(output),
            };
            let records = aggregate_metadata(&metadata_dir, &config)?;
            info!("Aggregated {} photo records", records.len());
        }
    }

    Ok(())
}
