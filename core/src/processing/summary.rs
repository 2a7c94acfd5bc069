use serde::{Deserialize, Serialize};

use crate::math::stats::StatsHelper;
use crate::processing::projector::ProcessedSeries;

/// Headline numbers shown alongside the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub sample_count: usize,
    pub gps_fix_count: usize,
    pub first_label: Option<String>,
    pub last_label: Option<String>,
    pub duration_ms: i64,
    pub average_speed: f64,
    pub max_speed: f64,
}

impl SeriesSummary {
    pub fn from_series(series: &ProcessedSeries) -> Self {
        let duration_ms = match (series.timestamps.first(), series.timestamps.last()) {
            (Some(first), Some(last)) => last.saturating_sub(*first),
            _ => 0,
        };
        Self {
            sample_count: series.len(),
            gps_fix_count: finite_fix_count(series),
            first_label: series.time_labels.first().cloned(),
            last_label: series.time_labels.last().cloned(),
            duration_ms,
            average_speed: StatsHelper::finite_mean(&series.speed),
            max_speed: StatsHelper::finite_max(&series.speed),
        }
    }
}

/// Fixes whose coordinates both parsed; empty GPS cells arrive as NaN.
fn finite_fix_count(series: &ProcessedSeries) -> usize {
    series
        .gps
        .lat
        .iter()
        .zip(&series.gps.lng)
        .filter(|(lat, lng)| lat.is_finite() && lng.is_finite())
        .count()
}
