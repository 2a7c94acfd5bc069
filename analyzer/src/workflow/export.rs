use anyhow::{Context, Result};
use motioncore::pipeline::PipelineOutput;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct SampleRow<'a> {
    timestamp: i64,
    time_label: &'a str,
    accel_x: f64,
    accel_y: f64,
    accel_z: f64,
    accel_magnitude: f64,
    gyro_x: f64,
    gyro_y: f64,
    gyro_z: f64,
    lat: Option<f64>,
    lng: Option<f64>,
    estimated_speed: Option<f64>,
}

/// Writes the series and summary as pretty JSON.
pub fn write_json(output: &PipelineOutput, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = output.to_json_pretty().context("serializing pipeline output")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Writes one row per annotated sample.
pub fn write_samples_csv(output: &PipelineOutput, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    write_sample_rows(output, &mut writer)
}

fn write_sample_rows<W: Write>(output: &PipelineOutput, writer: &mut csv::Writer<W>) -> Result<()> {
    let labels = output.series.time_labels.iter();
    let magnitudes = output.series.acceleration.magnitude.iter();
    for ((sample, label), magnitude) in output.samples.iter().zip(labels).zip(magnitudes) {
        writer.serialize(SampleRow {
            timestamp: sample.timestamp,
            time_label: label,
            accel_x: sample.accel.x,
            accel_y: sample.accel.y,
            accel_z: sample.accel.z,
            accel_magnitude: *magnitude,
            gyro_x: sample.gyro.x,
            gyro_y: sample.gyro.y,
            gyro_z: sample.gyro.z,
            lat: sample.gps.map(|fix| fix.lat),
            lng: sample.gps.map(|fix| fix.lng),
            estimated_speed: sample.estimated_speed,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}
