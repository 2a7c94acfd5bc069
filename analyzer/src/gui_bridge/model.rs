use motioncore::pipeline::PipelineOutput;
use motioncore::processing::{ProcessedSeries, SeriesSummary};
use serde::{Deserialize, Serialize};

/// Snapshot served to the chart front end.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VisualizationModel {
    pub series: ProcessedSeries,
    pub summary: SeriesSummary,
    pub source: Option<String>,
}

impl VisualizationModel {
    pub fn from_output(output: &PipelineOutput, source: Option<String>) -> Self {
        Self {
            series: output.series.clone(),
            summary: output.summary.clone(),
            source,
        }
    }
}
