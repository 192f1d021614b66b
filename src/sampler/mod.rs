mod clock;
mod error;
mod sampler;
mod types;

pub use clock::{FixedClock, SystemClock, TimeSource};
pub use error::SamplerError;
pub use sampler::{Sampler, NUM_STEPS};
pub use types::{TimeStep, TrackSample};
