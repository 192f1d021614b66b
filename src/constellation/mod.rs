mod descriptor;
mod error;
mod executor;
mod pipeline;

pub use descriptor::SatelliteDescriptor;
pub use error::{ConstellationError, FailureKind, SatelliteFailure};
pub use executor::{Constellation, ExecutorSettings};
