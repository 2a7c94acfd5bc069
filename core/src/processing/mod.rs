pub mod fusion;
pub mod normalizer;
pub mod projector;
pub mod summary;

pub use fusion::{
    FusionEngine, FusionParams, FusionRun, FusionState, FusionStats, FusionStep, SpeedSource,
};
pub use normalizer::sort_chronologically;
pub use projector::{
    AccelerationSeries, GpsSeries, GyroscopeSeries, ProcessedSeries, SeriesProjector,
};
pub use summary::SeriesSummary;
