use thiserror::Error;

#[derive(Debug, Error)]
pub enum CzmlError {
    #[error("no time steps to build a clock from")]
    EmptyWindow,
    #[error("track has {track} samples for {steps} steps")]
    TrackLength { track: usize, steps: usize },
}
