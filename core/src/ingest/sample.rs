use serde::{Deserialize, Serialize};

/// Three-axis reading in the sensor frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub lat: f64,
    pub lng: f64,
}

impl GpsFix {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One instant of accelerometer, gyroscope and optional GPS data.
///
/// `estimated_speed` stays `None` until the fusion engine has visited the
/// sample, and is never negative once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Milliseconds since an arbitrary epoch.
    pub timestamp: i64,
    /// m/s².
    pub accel: Vector3,
    /// Passed through in whatever unit the recorder used.
    pub gyro: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsFix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_speed: Option<f64>,
}

impl MotionSample {
    pub fn new(timestamp: i64, accel: Vector3, gyro: Vector3) -> Self {
        Self {
            timestamp,
            accel,
            gyro,
            gps: None,
            estimated_speed: None,
        }
    }

    pub fn with_gps(mut self, lat: f64, lng: f64) -> Self {
        self.gps = Some(GpsFix::new(lat, lng));
        self
    }

    pub(crate) fn with_speed(mut self, speed: f64) -> Self {
        self.estimated_speed = Some(speed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_of_unit_axes() {
        assert_eq!(Vector3::new(3.0, 4.0, 0.0).magnitude(), 5.0);
        assert_eq!(Vector3::default().magnitude(), 0.0);
    }

    #[test]
    fn new_sample_has_no_speed_or_fix() {
        let sample = MotionSample::new(10, Vector3::default(), Vector3::default());
        assert!(sample.gps.is_none());
        assert!(sample.estimated_speed.is_none());
        let sample = sample.with_gps(1.0, 2.0);
        assert_eq!(sample.gps, Some(GpsFix::new(1.0, 2.0)));
    }
}
