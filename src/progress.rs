/// Cumulative counters for one image-normalization run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub images: usize,
    pub metadata_files: usize,
    pub failed: usize,
}

/// How one visited file was handled.
#[derive(Debug, Clone, Copy)]
pub enum VisitOutcome {
    Resized,
    SidecarCopied,
    Failed,
    Ignored,
}

const REPORT_EVERY: usize = 100;

/// Observes visit outcomes and reports cumulative counts every
/// `REPORT_EVERY` files. Traversal itself knows nothing about cadence.
#[derive(Debug, Default)]
pub struct ProgressReporter {
    stats: ProcessingStats,
}

impl ProgressReporter {
    pub fn new() -> Self {
        ProgressReporter::default()
    }

    pub fn record(&mut self, outcome: VisitOutcome) {
        self.stats.total_files += 1;
        match outcome {
            VisitOutcome::Resized => self.stats.images += 1,
            VisitOutcome::SidecarCopied => self.stats.metadata_files += 1,
            VisitOutcome::Failed => self.stats.failed += 1,
            VisitOutcome::Ignored => {}
        }

        if self.stats.total_files % REPORT_EVERY == 0 {
            log::info!(
                "Processed {} files: {} images, {} metadata files, {} failed images...",
                self.stats.total_files,
                self.stats.images,
                self.stats.metadata_files,
                self.stats.failed
            );
        }
    }

    pub fn into_stats(self) -> ProcessingStats {
        self.stats
    }
}
