use std::collections::BTreeMap;
use std::time::Duration;

use strum_macros::Display;
use thiserror::Error;

use crate::czml::CzmlError;
use crate::sampler::SamplerError;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("satellite descriptor without a name")]
    MissingName,
    #[error("duplicate satellite name: {0}")]
    Duplicate(String),
    #[error("{0}: orbit_count must be at least 1")]
    OrbitCount(String),
    #[error("{0}: num_steps must be positive")]
    NumSteps(String),
    #[error("{0}: speed must be finite")]
    Speed(String),
    #[error("{0}: swath_width must be a positive number of meters")]
    SwathWidth(String),
}

/// Failure inside one satellite's sample-and-assemble pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("sampler error: {0}")]
    Sampler(#[from] SamplerError),
    #[error("czml error: {0}")]
    Czml(#[from] CzmlError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    Lookup,
    Pipeline,
    WorkerCrashed,
    WorkerTimeout,
    Spawn,
}

/// Why a satellite has no document
#[derive(Debug, Error)]
pub enum SatelliteFailure {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
    #[error("worker terminated without a result: {0}")]
    WorkerCrashed(String),
    #[error("worker gave no result within {0:?}")]
    WorkerTimeout(Duration),
    #[error("failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),
}

impl SatelliteFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            SatelliteFailure::Pipeline(PipelineError::Sampler(e)) if e.is_lookup() => {
                FailureKind::Lookup
            }
            SatelliteFailure::Pipeline(_) => FailureKind::Pipeline,
            SatelliteFailure::WorkerCrashed(_) => FailureKind::WorkerCrashed,
            SatelliteFailure::WorkerTimeout(_) => FailureKind::WorkerTimeout,
            SatelliteFailure::Spawn(_) => FailureKind::Spawn,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConstellationError {
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorError),
    #[error("num_steps must be positive")]
    NumSteps,
    #[error("worker_timeout must be greater than zero")]
    ZeroTimeout,
    #[error("{} satellite(s) failed: {}", .failures.len(), summarize(.failures))]
    Failed {
        failures: BTreeMap<String, SatelliteFailure>,
    },
}

fn summarize(failures: &BTreeMap<String, SatelliteFailure>) -> String {
    failures
        .iter()
        .map(|(name, failure)| format!("{}: {}", name, failure))
        .collect::<Vec<_>>()
        .join("; ")
}
