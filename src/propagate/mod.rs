mod error;
mod geodetic;
mod propagator;
#[cfg(test)]
mod stub;
pub(crate) mod tle_loader;
mod types;

pub use error::PropagateError;
pub use propagator::{Propagator, Sgp4Propagator};
#[cfg(test)]
pub use stub::StubPropagator;
pub use tle_loader::TleCatalog;
pub use types::SatelliteInfo;
