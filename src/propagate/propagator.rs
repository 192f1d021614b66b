use chrono::{DateTime, Utc};

use crate::propagate::error::PropagateError;
use crate::propagate::geodetic::{ecef_to_geodetic, sidereal_time, teme_to_ecef_position};
use crate::propagate::tle_loader::TleCatalog;
use crate::propagate::types::Geodetic;

/// Orbit source for the sampler. Implementations are shared read-only between
/// worker threads.
pub trait Propagator: Send + Sync {
    /// Period of one orbit, in minutes
    fn period_minutes(&self, satellite: &str) -> Result<f64, PropagateError>;

    fn geodetic_position(
        &self,
        satellite: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Geodetic, PropagateError>;
}

/// SGP4 over a TLE catalog
pub struct Sgp4Propagator {
    catalog: TleCatalog,
}

impl Sgp4Propagator {
    pub fn new(catalog: TleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TleCatalog {
        &self.catalog
    }
}

impl Propagator for Sgp4Propagator {
    fn period_minutes(&self, satellite: &str) -> Result<f64, PropagateError> {
        Ok(self.catalog.get(satellite)?.period_minutes())
    }

    fn geodetic_position(
        &self,
        satellite: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Geodetic, PropagateError> {
        let entry = self.catalog.get(satellite)?;

        let minutes = entry
            .elements
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .map_err(|e| PropagateError::Propagation(e.to_string()))?;

        let prediction = entry.constants.propagate(minutes)?;
        let ecef = teme_to_ecef_position(prediction.position, sidereal_time(timestamp));

        Ok(ecef_to_geodetic(ecef))
    }
}
