use anyhow::Context;
use motioncore::prelude::{MalformedPolicy, PipelineConfig, DEFAULT_LABEL_FORMAT};
use motioncore::processing::FusionParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Workflow settings, loadable from YAML. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub fusion: FusionParams,
    pub malformed: MalformedPolicy,
    pub label_format: String,
    pub output: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            fusion: FusionParams::default(),
            malformed: MalformedPolicy::Lenient,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
            output: None,
            export_csv: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(strict: bool, label_format: Option<String>) -> Self {
        let mut config = Self::default();
        config.apply_args(strict, label_format);
        config
    }

    /// Command-line flags win over whatever the YAML file said.
    pub fn apply_args(&mut self, strict: bool, label_format: Option<String>) {
        if strict {
            self.malformed = MalformedPolicy::Strict;
        }
        if let Some(format) = label_format {
            self.label_format = format;
        }
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            fusion: self.fusion,
            malformed: self.malformed,
            label_format: self.label_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_pipeline_config() {
        let cfg = WorkflowConfig::from_args(true, Some("%H:%M:%S".into()));
        let pipeline = cfg.to_pipeline_config();
        assert_eq!(pipeline.malformed, MalformedPolicy::Strict);
        assert_eq!(pipeline.label_format, "%H:%M:%S");
        assert_eq!(pipeline.fusion, FusionParams::default());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"malformed: strict\nfusion:\n  decay: 0.9\n  gravity: 9.8\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.malformed, MalformedPolicy::Strict);
        assert_eq!(cfg.fusion.decay, 0.9);
        assert_eq!(cfg.fusion.gravity, 9.8);
        assert_eq!(cfg.fusion.gps_weight, 0.7);
        assert_eq!(cfg.label_format, DEFAULT_LABEL_FORMAT);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("/nonexistent/workflow.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
