use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::ingest::sample::MotionSample;
use crate::prelude::DEFAULT_LABEL_FORMAT;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelerationSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub magnitude: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GyroscopeSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

/// Coordinates of the samples that carried a fix; not aligned with the other channels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsSeries {
    pub lat: Vec<f64>,
    pub lng: Vec<f64>,
}

/// Parallel per-channel arrays ready for charting.
///
/// `gps` and `speed` may be shorter than `timestamps`: fixes are only pushed
/// for samples that have one, and the first sample has no speed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSeries {
    pub timestamps: Vec<i64>,
    pub time_labels: Vec<String>,
    pub acceleration: AccelerationSeries,
    pub gyroscope: GyroscopeSeries,
    pub gps: GpsSeries,
    pub speed: Vec<f64>,
}

impl ProcessedSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Projects speed-annotated samples into a [`ProcessedSeries`].
#[derive(Debug, Clone)]
pub struct SeriesProjector {
    label_format: String,
}

impl Default for SeriesProjector {
    fn default() -> Self {
        Self {
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }
}

impl SeriesProjector {
    /// Uses `label_format` (chrono strftime syntax) for time labels, falling
    /// back to the default when it does not parse.
    pub fn new(label_format: &str) -> Self {
        if StrftimeItems::new(label_format).any(|item| matches!(item, Item::Error)) {
            warn!(
                "invalid time label format {:?}, using {:?}",
                label_format, DEFAULT_LABEL_FORMAT
            );
            return Self::default();
        }
        Self {
            label_format: label_format.to_string(),
        }
    }

    pub fn label_format(&self) -> &str {
        &self.label_format
    }

    pub fn project(&self, samples: &[MotionSample]) -> ProcessedSeries {
        let mut series = ProcessedSeries::default();
        for sample in samples {
            series.timestamps.push(sample.timestamp);
            series.time_labels.push(self.time_label(sample.timestamp));

            let accel = &sample.accel;
            series.acceleration.x.push(accel.x);
            series.acceleration.y.push(accel.y);
            series.acceleration.z.push(accel.z);
            series
                .acceleration
                .magnitude
                .push((accel.x * accel.x + accel.y * accel.y + accel.z * accel.z).sqrt());

            series.gyroscope.x.push(sample.gyro.x);
            series.gyroscope.y.push(sample.gyro.y);
            series.gyroscope.z.push(sample.gyro.z);

            if let Some(fix) = sample.gps {
                series.gps.lat.push(fix.lat);
                series.gps.lng.push(fix.lng);
            }
            if let Some(speed) = sample.estimated_speed {
                series.speed.push(speed);
            }
        }
        series
    }

    /// Renders a Unix-millisecond timestamp in UTC.
    pub fn time_label(&self, timestamp: i64) -> String {
        match DateTime::from_timestamp_millis(timestamp) {
            Some(time) => time.format(&self.label_format).to_string(),
            None => timestamp.to_string(),
        }
    }
}
