use serde::{Deserialize, Serialize};

use crate::processing::fusion::FusionParams;

/// Default chrono format used to render time labels.
pub const DEFAULT_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// How the parser treats a field that fails numeric conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Keep the field as NaN and carry on. A row whose timestamp cannot be
    /// read is the exception: it is dropped, since timestamps are integers.
    #[default]
    Lenient,
    /// Reject the input at the first malformed field.
    Strict,
}

/// Shared configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub fusion: FusionParams,
    pub malformed: MalformedPolicy,
    pub label_format: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fusion: FusionParams::default(),
            malformed: MalformedPolicy::default(),
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }
}

/// Errors raised while ingesting delimited sample text.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("missing required columns: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },
    #[error("malformed value {value:?} for column `{column}` on line {line}")]
    MalformedValue {
        line: u64,
        column: String,
        value: String,
    },
    #[error("csv read failure: {0}")]
    Csv(#[from] csv::Error),
}

pub type PipelineResult<T> = Result<T, IngestError>;
