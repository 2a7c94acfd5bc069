//! Speed-estimation core for recorded motion logs.
//!
//! Accelerometer/gyroscope samples with optional GPS fixes are parsed from
//! CSV, put in chronological order, annotated with a fused speed estimate
//! and projected into per-channel series for charting.

pub mod ingest;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use ingest::{GpsFix, MotionSample, SampleParser, Vector3};
pub use pipeline::{MotionPipeline, PipelineOutput};
pub use prelude::{IngestError, MalformedPolicy, PipelineConfig, PipelineResult};
pub use processing::{
    FusionEngine, FusionParams, FusionState, ProcessedSeries, SeriesProjector, SeriesSummary,
};
