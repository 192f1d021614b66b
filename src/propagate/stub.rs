use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::propagate::error::PropagateError;
use crate::propagate::propagator::Propagator;
use crate::propagate::types::Geodetic;

/// Deterministic propagator: fixed period, position advancing linearly in time.
pub struct StubPropagator {
    periods: HashMap<String, f64>,
    altitude_km: f64,
    panic_on: Option<String>,
    slow: Option<(String, Duration)>,
}

impl StubPropagator {
    pub fn new() -> Self {
        Self {
            periods: HashMap::new(),
            altitude_km: 0.408,
            panic_on: None,
            slow: None,
        }
    }

    pub fn with_satellite(mut self, name: &str, period_minutes: f64) -> Self {
        self.periods.insert(name.to_string(), period_minutes);
        self
    }

    /// Panic inside `geodetic_position` for this satellite, to simulate a crashed worker
    pub fn panicking_on(mut self, name: &str) -> Self {
        self.panic_on = Some(name.to_string());
        self.periods.insert(name.to_string(), 90.0);
        self
    }

    /// Sleep for `delay` on every position request for this satellite
    pub fn slow_on(mut self, name: &str, delay: Duration) -> Self {
        self.slow = Some((name.to_string(), delay));
        self.periods.insert(name.to_string(), 90.0);
        self
    }
}

impl Propagator for StubPropagator {
    fn period_minutes(&self, satellite: &str) -> Result<f64, PropagateError> {
        self.periods
            .get(satellite)
            .copied()
            .ok_or_else(|| PropagateError::SatelliteNotFound(satellite.to_string()))
    }

    fn geodetic_position(
        &self,
        satellite: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Geodetic, PropagateError> {
        if self.panic_on.as_deref() == Some(satellite) {
            panic!("stub propagator crash for {satellite}");
        }
        if let Some((name, delay)) = &self.slow {
            if name == satellite {
                std::thread::sleep(*delay);
            }
        }
        self.period_minutes(satellite)?;
        let seconds = timestamp.timestamp() as f64 % 3600.0;
        Ok(Geodetic {
            longitude_deg: seconds / 10.0 - 180.0,
            latitude_deg: (seconds / 3600.0) * 90.0 - 45.0,
            altitude_km: self.altitude_km,
        })
    }
}
