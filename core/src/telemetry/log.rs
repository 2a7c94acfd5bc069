use log::{info, warn};

use crate::prelude::IngestError;
use crate::processing::fusion::FusionStats;
use crate::processing::summary::SeriesSummary;

/// Emits one line per pipeline run through the `log` facade.
pub struct LogManager {
    source: String,
}

impl LogManager {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn record_run(&self, summary: &SeriesSummary, stats: &FusionStats, dropped_rows: usize) {
        info!(
            "[{}] {} samples ({} gps, {} dropped), {} stale intervals, avg {:.2} m/s, max {:.2} m/s",
            self.source,
            summary.sample_count,
            summary.gps_fix_count,
            dropped_rows,
            stats.stale,
            summary.average_speed,
            summary.max_speed
        );
    }

    pub fn record_failure(&self, error: &IngestError) {
        warn!("[{}] ingest rejected: {}", self.source, error);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("pipeline")
    }
}
