mod document;
mod error;
mod packet;
mod style;

pub use document::{assemble, Document};
pub use error::CzmlError;
pub use style::{Rgba, DEFAULT_SWATH_COLOR, DEFAULT_TRACK_COLOR};
