use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use motioncore::pipeline::{MotionPipeline, PipelineOutput};
use motioncore::telemetry::MetricsSnapshot;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Runs the motion pipeline for the CLI and the HTTP bridge.
#[derive(Clone)]
pub struct Runner {
    pipeline: Arc<MotionPipeline>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        let pipeline = Arc::new(MotionPipeline::new(config.to_pipeline_config()));
        Self { pipeline }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.pipeline.metrics()
    }

    pub fn execute(&self, csv_text: &str) -> anyhow::Result<PipelineOutput> {
        let output = self
            .pipeline
            .run(csv_text)
            .context("processing motion samples")?;
        Ok(output)
    }

    pub fn execute_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<PipelineOutput> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading motion log {}", path_ref.display()))?;
        self.execute(&contents)
            .with_context(|| format!("analyzing {}", path_ref.display()))
    }
}
