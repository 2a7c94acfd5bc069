use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};

use crate::ingest::sample::{MotionSample, Vector3};
use crate::prelude::{IngestError, MalformedPolicy, PipelineResult};

/// Columns every input must name in its header.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "timestamp",
    "accel_x",
    "accel_y",
    "accel_z",
    "gyro_x",
    "gyro_y",
    "gyro_z",
];

const LAT_COLUMN: &str = "lat";
const LNG_COLUMN: &str = "lng";

/// Samples produced by one parse, in file order.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub samples: Vec<MotionSample>,
    /// Rows skipped because their timestamp could not be read.
    pub dropped_rows: usize,
}

/// Header positions resolved by column name.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    timestamp: usize,
    accel: [usize; 3],
    gyro: [usize; 3],
    gps: Option<(usize, usize)>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> PipelineResult<Self> {
        let find = |name: &str| headers.iter().position(|header| header == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|name| find(*name).is_none())
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::Validation { missing });
        }

        let required = |name: &str| find(name).unwrap_or_default();
        let gps = match (find(LAT_COLUMN), find(LNG_COLUMN)) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        };

        Ok(Self {
            timestamp: required("timestamp"),
            accel: [required("accel_x"), required("accel_y"), required("accel_z")],
            gyro: [required("gyro_x"), required("gyro_y"), required("gyro_z")],
            gps,
        })
    }
}

/// Reads comma-separated motion logs into [`MotionSample`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleParser {
    policy: MalformedPolicy,
}

impl SampleParser {
    pub fn new(policy: MalformedPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Parses `text`, validating the header before any row is read.
    pub fn parse(&self, text: &str) -> PipelineResult<ParseReport> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let columns = ColumnMap::resolve(&headers)?;
        let mut report = ParseReport::default();

        for record in reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            match self.parse_row(&record, &columns, &headers, line)? {
                Some(sample) => report.samples.push(sample),
                None => report.dropped_rows += 1,
            }
        }

        debug!(
            "parsed {} samples ({} dropped, gps={})",
            report.samples.len(),
            report.dropped_rows,
            columns.gps.is_some()
        );
        Ok(report)
    }

    fn parse_row(
        &self,
        record: &StringRecord,
        columns: &ColumnMap,
        headers: &StringRecord,
        line: u64,
    ) -> PipelineResult<Option<MotionSample>> {
        let raw_timestamp = record.get(columns.timestamp).unwrap_or_default();
        let timestamp = match parse_timestamp(raw_timestamp) {
            Some(timestamp) => timestamp,
            None => {
                self.malformed(headers, columns.timestamp, raw_timestamp, line)?;
                warn!(
                    "dropping line {}: unreadable timestamp {:?}",
                    line, raw_timestamp
                );
                return Ok(None);
            }
        };

        let field = |index: usize| self.field(record, headers, index, line);
        let accel = Vector3::new(
            field(columns.accel[0])?,
            field(columns.accel[1])?,
            field(columns.accel[2])?,
        );
        let gyro = Vector3::new(
            field(columns.gyro[0])?,
            field(columns.gyro[1])?,
            field(columns.gyro[2])?,
        );

        let mut sample = MotionSample::new(timestamp, accel, gyro);
        if let Some((lat, lng)) = columns.gps {
            sample = sample.with_gps(field(lat)?, field(lng)?);
        }
        Ok(Some(sample))
    }

    fn field(
        &self,
        record: &StringRecord,
        headers: &StringRecord,
        index: usize,
        line: u64,
    ) -> PipelineResult<f64> {
        let raw = record.get(index).unwrap_or_default();
        match raw.parse::<f64>() {
            Ok(value) => Ok(value),
            Err(_) => {
                self.malformed(headers, index, raw, line)?;
                Ok(f64::NAN)
            }
        }
    }

    fn malformed(
        &self,
        headers: &StringRecord,
        index: usize,
        raw: &str,
        line: u64,
    ) -> PipelineResult<()> {
        match self.policy {
            MalformedPolicy::Lenient => Ok(()),
            MalformedPolicy::Strict => Err(IngestError::MalformedValue {
                line,
                column: headers.get(index).unwrap_or_default().to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

/// Parses with the lenient policy.
pub fn parse_samples(text: &str) -> PipelineResult<Vec<MotionSample>> {
    SampleParser::default().parse(text).map(|report| report.samples)
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::sample::GpsFix;

    const HEADER: &str = "timestamp,accel_x,accel_y,accel_z,gyro_x,gyro_y,gyro_z";

    #[test]
    fn parses_rows_in_file_order() {
        let text = format!("{HEADER}\n2000,1,2,3,0.1,0.2,0.3\n1000,4,5,6,0.4,0.5,0.6\n");
        let samples = parse_samples(&text).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, 2000);
        assert_eq!(samples[0].accel, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(samples[1].gyro, Vector3::new(0.4, 0.5, 0.6));
        assert!(samples.iter().all(|s| s.gps.is_none()));
        assert!(samples.iter().all(|s| s.estimated_speed.is_none()));
    }

    #[test]
    fn missing_required_column_fails_validation() {
        let text = "timestamp,accel_x,accel_y,gyro_x,gyro_y,gyro_z\n0,1,2,3,4,5\n";
        match parse_samples(text) {
            Err(IngestError::Validation { missing }) => assert_eq!(missing, vec!["accel_z"]),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn empty_input_fails_validation() {
        assert!(matches!(
            parse_samples(""),
            Err(IngestError::Validation { .. })
        ));
    }

    #[test]
    fn columns_are_located_by_name() {
        let text = "gyro_z,gyro_y,gyro_x,accel_z,accel_y,accel_x,timestamp\n6,5,4,3,2,1,42\n";
        let samples = parse_samples(text).unwrap();
        assert_eq!(samples[0].timestamp, 42);
        assert_eq!(samples[0].accel, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(samples[0].gyro, Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn gps_requires_both_columns() {
        let both = format!("{HEADER},lat,lng\n0,0,0,0,0,0,0,45.5,-73.6\n");
        let samples = parse_samples(&both).unwrap();
        assert_eq!(samples[0].gps, Some(GpsFix::new(45.5, -73.6)));

        let lat_only = format!("{HEADER},lat\n0,0,0,0,0,0,0,45.5\n");
        let samples = parse_samples(&lat_only).unwrap();
        assert!(samples[0].gps.is_none());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = format!("{HEADER}\n\n0,0,0,9.81,0,0,0\n   \n1000,0,0,9.81,0,0,0\n\n");
        let samples = parse_samples(&text).unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn lenient_policy_keeps_malformed_values_as_nan() {
        let text = format!("{HEADER}\n0,abc,0,9.81,0,0\n");
        let samples = parse_samples(&text).unwrap();
        assert!(samples[0].accel.x.is_nan());
        // gyro_z is absent from the row entirely
        assert!(samples[0].gyro.z.is_nan());
        assert_eq!(samples[0].accel.z, 9.81);
    }

    #[test]
    fn lenient_policy_drops_rows_with_unreadable_timestamp() {
        let text = format!("{HEADER}\nsoon,0,0,0,0,0,0\n1500.7,0,0,0,0,0,0\n");
        let report = SampleParser::default().parse(&text).unwrap();
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.samples.len(), 1);
        assert_eq!(report.samples[0].timestamp, 1500);
    }

    #[test]
    fn stray_quote_does_not_swallow_later_rows() {
        let text = format!("{HEADER}\n1000,\"0,0,0,0,0,0,0\n2000,0,0,9.81,0,0,0\n");
        let report = SampleParser::default().parse(&text).unwrap();
        assert_eq!(report.dropped_rows, 0);
        let stamps: Vec<i64> = report.samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![1000, 2000]);
        assert!(report.samples[0].accel.x.is_nan());
        assert_eq!(report.samples[0].accel.y, 0.0);
        assert_eq!(report.samples[1].accel.z, 9.81);
    }

    #[test]
    fn strict_policy_rejects_malformed_values() {
        let text = format!("{HEADER}\n0,0,0,0,0,0,0\n1000,0,oops,0,0,0,0\n");
        let parser = SampleParser::new(MalformedPolicy::Strict);
        match parser.parse(&text) {
            Err(IngestError::MalformedValue {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "accel_y");
                assert_eq!(value, "oops");
            }
            other => panic!("expected malformed value error, got {:?}", other),
        }
    }
}
