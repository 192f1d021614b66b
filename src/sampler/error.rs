use thiserror::Error;

use crate::propagate::PropagateError;

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("invalid orbital period for {satellite}: {minutes} min")]
    InvalidPeriod { satellite: String, minutes: f64 },
    #[error("sample window for {satellite} is too long: {seconds} s")]
    WindowTooLong { satellite: String, seconds: f64 },
    #[error("number of steps must be positive")]
    NoSteps,
    #[error("propagate error: {0}")]
    Propagate(#[from] PropagateError),
}

impl SamplerError {
    /// True when the propagator could not resolve the satellite
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            SamplerError::Propagate(PropagateError::SatelliteNotFound(_))
        )
    }
}
