use log::debug;
use serde::{Deserialize, Serialize};

use crate::ingest::sample::MotionSample;
use crate::math::geo::{haversine_distance, EARTH_RADIUS_M};

/// Tunable constants of the speed fusion model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionParams {
    /// Subtracted from the accelerometer magnitude, m/s².
    pub gravity: f64,
    /// Multiplier applied to the fused speed on every integrated step.
    pub decay: f64,
    pub accel_weight: f64,
    pub gps_weight: f64,
    /// Longest gap, in seconds, still integrated; longer gaps carry the speed forward.
    pub max_interval_s: f64,
    pub earth_radius_m: f64,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            decay: 0.95,
            accel_weight: 0.3,
            gps_weight: 0.7,
            max_interval_s: 1.0,
            earth_radius_m: EARTH_RADIUS_M,
        }
    }
}

/// Running state threaded through the fold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FusionState {
    /// m/s
    pub current_speed: f64,
}

impl FusionState {
    pub fn seeded(current_speed: f64) -> Self {
        Self { current_speed }
    }
}

/// Where the speed written by a step came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedSource {
    /// Stale or non-increasing interval; previous speed carried forward.
    Carried,
    /// Dead reckoning only.
    Accelerometer,
    /// Dead reckoning blended with GPS ground speed.
    Fused,
}

/// Outcome of folding one consecutive pair of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionStep {
    pub state: FusionState,
    pub source: SpeedSource,
    /// Blended speed before decay and clamping.
    pub fused: f64,
}

/// Counters describing one fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FusionStats {
    pub integrated: usize,
    pub gps_fused: usize,
    pub stale: usize,
}

impl FusionStats {
    fn record(&mut self, source: SpeedSource) {
        match source {
            SpeedSource::Carried => self.stale += 1,
            SpeedSource::Accelerometer => self.integrated += 1,
            SpeedSource::Fused => {
                self.integrated += 1;
                self.gps_fused += 1;
            }
        }
    }
}

/// Samples annotated with speed, plus fold counters.
#[derive(Debug, Clone, Default)]
pub struct FusionRun {
    pub samples: Vec<MotionSample>,
    pub stats: FusionStats,
}

/// Dead-reckoning speed estimator fused with GPS ground speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FusionEngine {
    params: FusionParams,
}

impl FusionEngine {
    pub fn new(params: FusionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FusionParams {
        &self.params
    }

    /// Annotates chronologically ordered samples with an estimated speed.
    ///
    /// The first sample is never given an estimate; every later sample is.
    /// The input is left untouched.
    pub fn run(&self, samples: &[MotionSample]) -> FusionRun {
        let mut run = FusionRun {
            samples: Vec::with_capacity(samples.len()),
            stats: FusionStats::default(),
        };
        let Some(first) = samples.first() else {
            return run;
        };
        run.samples.push(first.clone());

        let final_state = samples
            .windows(2)
            .fold(FusionState::default(), |state, pair| {
                let step = self.step(state, &pair[0], &pair[1]);
                run.stats.record(step.source);
                run.samples
                    .push(pair[1].clone().with_speed(step.state.current_speed));
                step.state
            });

        debug!(
            "fusion: {} integrated, {} gps-fused, {} stale, final speed {:.3}",
            run.stats.integrated, run.stats.gps_fused, run.stats.stale, final_state.current_speed
        );
        run
    }

    /// Folds a single (previous, current) pair starting from `state`.
    pub fn step(
        &self,
        state: FusionState,
        previous: &MotionSample,
        current: &MotionSample,
    ) -> FusionStep {
        let dt = current.timestamp.saturating_sub(previous.timestamp) as f64 / 1000.0;
        if dt <= 0.0 || dt > self.params.max_interval_s {
            return FusionStep {
                state,
                source: SpeedSource::Carried,
                fused: state.current_speed,
            };
        }

        let from_accel = self.speed_from_accel(state.current_speed, current, dt);
        let from_gps = self.speed_from_gps(previous, current, dt).unwrap_or(0.0);

        let (fused, source) = if from_gps > 0.0 {
            (
                self.params.accel_weight * from_accel + self.params.gps_weight * from_gps,
                SpeedSource::Fused,
            )
        } else {
            (from_accel, SpeedSource::Accelerometer)
        };

        FusionStep {
            state: FusionState::seeded(clamp_non_negative(fused * self.params.decay)),
            source,
            fused,
        }
    }

    /// Integrates net (gravity-removed) acceleration over `dt` seconds.
    pub fn speed_from_accel(&self, current_speed: f64, sample: &MotionSample, dt: f64) -> f64 {
        let net = sample.accel.magnitude() - self.params.gravity;
        clamp_non_negative(current_speed + net * dt)
    }

    /// Ground speed between two fixes, `None` when either sample lacks one.
    pub fn speed_from_gps(
        &self,
        previous: &MotionSample,
        current: &MotionSample,
        dt: f64,
    ) -> Option<f64> {
        let (from, to) = (previous.gps?, current.gps?);
        let distance = haversine_distance(
            from.lat,
            from.lng,
            to.lat,
            to.lng,
            self.params.earth_radius_m,
        );
        Some(distance / dt)
    }
}

/// Floors negative values at zero; NaN passes through unchanged.
fn clamp_non_negative(value: f64) -> f64 {
    if value < 0.0 {
        0.0
    } else {
        value
    }
}
