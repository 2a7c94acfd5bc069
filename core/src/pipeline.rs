use serde::Serialize;

use crate::ingest::parser::SampleParser;
use crate::ingest::sample::MotionSample;
use crate::prelude::{PipelineConfig, PipelineResult};
use crate::processing::fusion::{FusionEngine, FusionStats};
use crate::processing::normalizer::sort_chronologically;
use crate::processing::projector::{ProcessedSeries, SeriesProjector};
use crate::processing::summary::SeriesSummary;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Sorted, speed-annotated samples.
    #[serde(skip)]
    pub samples: Vec<MotionSample>,
    pub series: ProcessedSeries,
    pub summary: SeriesSummary,
    #[serde(skip)]
    pub stats: FusionStats,
    #[serde(skip)]
    pub dropped_rows: usize,
}

impl PipelineOutput {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Raw text -> typed samples -> sorted samples -> speed-annotated samples -> series.
pub struct MotionPipeline {
    config: PipelineConfig,
    parser: SampleParser,
    engine: FusionEngine,
    projector: SeriesProjector,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl MotionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            parser: SampleParser::new(config.malformed),
            engine: FusionEngine::new(config.fusion),
            projector: SeriesProjector::new(&config.label_format),
            logger: LogManager::default(),
            metrics: MetricsRecorder::new(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Runs every stage over `text`. A parse failure stops the run before
    /// anything is projected.
    pub fn run(&self, text: &str) -> PipelineResult<PipelineOutput> {
        let report = match self.parser.parse(text) {
            Ok(report) => report,
            Err(err) => {
                self.logger.record_failure(&err);
                self.metrics.record_failure();
                return Err(err);
            }
        };

        let sorted = sort_chronologically(&report.samples);
        let fusion = self.engine.run(&sorted);
        let series = self.projector.project(&fusion.samples);
        let summary = SeriesSummary::from_series(&series);

        self.logger
            .record_run(&summary, &fusion.stats, report.dropped_rows);
        self.metrics.record_run(series.len());

        Ok(PipelineOutput {
            samples: fusion.samples,
            series,
            summary,
            stats: fusion.stats,
            dropped_rows: report.dropped_rows,
        })
    }
}

impl Default for MotionPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{IngestError, MalformedPolicy};
    use approx::assert_relative_eq;

    const CSV: &str = "\
timestamp,accel_x,accel_y,accel_z,gyro_x,gyro_y,gyro_z,lat,lng
1000,0,0,11.81,0.1,0.1,0.1,0,1
0,0,0,11.81,0.0,0.0,0.0,0,0
1500,0,0,9.81,0.2,0.2,0.2,0,1
";

    #[test]
    fn pipeline_sorts_fuses_and_projects() {
        let pipeline = MotionPipeline::default();
        let output = pipeline.run(CSV).unwrap();

        assert_eq!(output.series.timestamps, vec![0, 1000, 1500]);
        assert_eq!(output.series.speed.len(), 2);
        assert_eq!(output.series.gps.lat.len(), 3);
        assert!(output.samples[0].estimated_speed.is_none());

        let expected = (0.3 * 2.0 + 0.7 * 111_194.926_644) * 0.95;
        assert_relative_eq!(output.series.speed[0], expected, max_relative = 1e-6);
        assert_eq!(output.stats.gps_fused, 1);
        assert_eq!(output.summary.sample_count, 3);
        assert_eq!(output.summary.duration_ms, 1500);
        assert_eq!(pipeline.metrics().runs, 1);
    }

    #[test]
    fn validation_failure_produces_no_output() {
        let pipeline = MotionPipeline::default();
        let err = pipeline
            .run("timestamp,accel_x,accel_y,gyro_x,gyro_y,gyro_z\n0,0,0,0,0,0\n")
            .unwrap_err();
        assert!(matches!(err, IngestError::Validation { .. }));
        assert_eq!(pipeline.metrics().failures, 1);
    }

    #[test]
    fn strict_configuration_rejects_malformed_rows() {
        let pipeline = MotionPipeline::new(PipelineConfig {
            malformed: MalformedPolicy::Strict,
            ..PipelineConfig::default()
        });
        let err = pipeline
            .run("timestamp,accel_x,accel_y,accel_z,gyro_x,gyro_y,gyro_z\n0,x,0,0,0,0,0\n")
            .unwrap_err();
        assert!(matches!(err, IngestError::MalformedValue { .. }));
    }

    #[test]
    fn output_serializes_series_and_summary() {
        let output = MotionPipeline::default().run(CSV).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["series"]["timestamps"][2], 1500);
        assert_eq!(json["summary"]["sampleCount"], 3);
        assert!(json.get("samples").is_none());
    }

    #[test]
    fn runs_are_independent() {
        let pipeline = MotionPipeline::default();
        let first = pipeline.run(CSV).unwrap();
        let second = pipeline.run(CSV).unwrap();
        assert_eq!(first.series, second.series);
    }
}
