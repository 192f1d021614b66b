pub mod czml;
pub mod error;
