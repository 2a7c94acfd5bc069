pub mod parser;
pub mod sample;

pub use parser::{parse_samples, ParseReport, SampleParser, REQUIRED_COLUMNS};
pub use sample::{GpsFix, MotionSample, Vector3};
