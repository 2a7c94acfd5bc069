use crate::ingest::sample::MotionSample;

/// Returns a copy of `samples` in ascending timestamp order.
///
/// Ties keep their original relative order.
pub fn sort_chronologically(samples: &[MotionSample]) -> Vec<MotionSample> {
    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|sample| sample.timestamp);
    sorted
}
