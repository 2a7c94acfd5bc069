/// Aggregations over speed series that skip not-a-number entries.
pub struct StatsHelper;

impl StatsHelper {
    pub fn finite_mean(samples: &[f64]) -> f64 {
        let (sum, count) = samples
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));
        if count == 0 {
            return 0.0;
        }
        sum / count as f64
    }

    pub fn finite_max(samples: &[f64]) -> f64 {
        samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .unwrap_or(0.0)
    }
}
