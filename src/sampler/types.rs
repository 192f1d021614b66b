use chrono::{DateTime, Utc};

/// Half-open sampling interval `[start_time, end_time)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStep {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// One ground-track point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    /// Seconds since the first step, when time was requested
    pub elapsed_s: Option<f64>,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    /// Zero when altitude was not requested
    pub altitude_m: f64,
}

impl TrackSample {
    /// Same point clamped to the ellipsoid, without a time offset
    pub fn on_surface(&self) -> Self {
        Self {
            elapsed_s: None,
            altitude_m: 0.0,
            ..*self
        }
    }

    /// Number of values this record flattens to
    pub fn arity(&self) -> usize {
        if self.elapsed_s.is_some() {
            4
        } else {
            3
        }
    }
}
