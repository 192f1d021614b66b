use std::collections::{BTreeMap, HashSet};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::descriptor::SatelliteDescriptor;
use super::error::{ConstellationError, DescriptorError, PipelineError, SatelliteFailure};
use super::pipeline::render_satellite;
use crate::czml::Document;
use crate::propagate::Propagator;
use crate::sampler::{SystemClock, TimeSource, NUM_STEPS};

const DEFAULT_WORKER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    /// Samples per satellite unless its descriptor overrides it
    pub num_steps: usize,
    /// Shared deadline for all workers of one execution
    pub worker_timeout: Duration,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            num_steps: NUM_STEPS,
            worker_timeout: DEFAULT_WORKER_TIMEOUT,
        }
    }
}

/// Documents and failures of one execution, both keyed by satellite name
#[derive(Debug, Default)]
pub struct ConstellationReport {
    pub documents: BTreeMap<String, Document>,
    pub failures: BTreeMap<String, SatelliteFailure>,
}

impl ConstellationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// All documents, or an error naming every failed satellite
    pub fn into_result(self) -> Result<BTreeMap<String, Document>, ConstellationError> {
        if self.failures.is_empty() {
            Ok(self.documents)
        } else {
            Err(ConstellationError::Failed {
                failures: self.failures,
            })
        }
    }
}

struct Worker {
    name: String,
    rx: Receiver<Result<Document, PipelineError>>,
    handle: JoinHandle<()>,
}

/// Set of satellites rendered in parallel, one OS thread each
pub struct Constellation {
    satellites: Vec<SatelliteDescriptor>,
    propagator: Arc<dyn Propagator>,
    clock: Arc<dyn TimeSource>,
    settings: ExecutorSettings,
}

impl Constellation {
    /// Validates every descriptor up front; nothing is spawned for an invalid set.
    pub fn load(
        satellites: Vec<SatelliteDescriptor>,
        propagator: Arc<dyn Propagator>,
        settings: ExecutorSettings,
    ) -> Result<Self, ConstellationError> {
        if settings.num_steps == 0 {
            return Err(ConstellationError::NumSteps);
        }
        if settings.worker_timeout.is_zero() {
            return Err(ConstellationError::ZeroTimeout);
        }

        let mut names = HashSet::new();
        for descriptor in &satellites {
            descriptor.validate()?;
            if !names.insert(descriptor.name.as_str()) {
                return Err(DescriptorError::Duplicate(descriptor.name.clone()).into());
            }
        }

        Ok(Self {
            satellites,
            propagator,
            clock: Arc::new(SystemClock),
            settings,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn satellites(&self) -> &[SatelliteDescriptor] {
        &self.satellites
    }

    pub fn get(&self, name: &str) -> Option<&SatelliteDescriptor> {
        self.satellites.iter().find(|d| d.name == name)
    }

    pub fn settings(&self) -> ExecutorSettings {
        self.settings
    }

    /// Strict execution: every satellite's document, or an error if any satellite failed
    pub fn execute(&self) -> Result<BTreeMap<String, Document>, ConstellationError> {
        self.execute_all().into_result()
    }

    /// Runs every pipeline on its own thread and gathers per-satellite outcomes.
    ///
    /// Each worker sends its result over a one-shot channel. The coordinator drains the
    /// channels against a single deadline; a worker that misses it is reported as timed
    /// out and left detached.
    pub fn execute_all(&self) -> ConstellationReport {
        self.run(&self.satellites)
    }

    /// Render a single configured satellite
    pub fn execute_one(&self, name: &str) -> Option<Result<Document, SatelliteFailure>> {
        let descriptor = self.get(name)?.clone();
        let mut report = self.run(std::slice::from_ref(&descriptor));
        Some(match report.documents.pop_first() {
            Some((_, document)) => Ok(document),
            None => Err(report
                .failures
                .pop_first()
                .map(|(_, failure)| failure)
                .unwrap_or_else(|| SatelliteFailure::WorkerCrashed("no result".into()))),
        })
    }

    fn run(&self, satellites: &[SatelliteDescriptor]) -> ConstellationReport {
        let started = Instant::now();
        let deadline = started + self.settings.worker_timeout;
        let mut report = ConstellationReport::default();

        log::info!("Rendering {} satellites", satellites.len());

        let mut workers = Vec::with_capacity(satellites.len());
        for (index, descriptor) in satellites.iter().enumerate() {
            match self.spawn_worker(index, descriptor) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    log::error!("Failed to spawn worker for {}: {}", descriptor.name, e);
                    report.failures.insert(descriptor.name.clone(), e.into());
                }
            }
        }

        for worker in workers {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match worker.rx.recv_timeout(remaining) {
                Ok(Ok(document)) => {
                    let _ = worker.handle.join();
                    report.documents.insert(document.name().to_string(), document);
                }
                Ok(Err(e)) => {
                    let _ = worker.handle.join();
                    log::warn!("Satellite {} failed: {}", worker.name, e);
                    report.failures.insert(worker.name, e.into());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let reason = match worker.handle.join() {
                        Err(panic) => panic_message(panic.as_ref()),
                        Ok(()) => "channel closed".to_string(),
                    };
                    log::error!("Worker for {} crashed: {}", worker.name, reason);
                    report
                        .failures
                        .insert(worker.name, SatelliteFailure::WorkerCrashed(reason));
                }
                Err(RecvTimeoutError::Timeout) => {
                    log::error!(
                        "Worker for {} timed out after {:?}",
                        worker.name,
                        self.settings.worker_timeout
                    );
                    report.failures.insert(
                        worker.name,
                        SatelliteFailure::WorkerTimeout(self.settings.worker_timeout),
                    );
                }
            }
        }

        log::info!(
            "Rendered {} of {} satellites in {:?}",
            report.documents.len(),
            satellites.len(),
            started.elapsed()
        );
        report
    }

    fn spawn_worker(
        &self,
        index: usize,
        descriptor: &SatelliteDescriptor,
    ) -> std::io::Result<Worker> {
        let (tx, rx) = mpsc::sync_channel(1);
        let num_steps = descriptor.num_steps.unwrap_or(self.settings.num_steps);
        let propagator = self.propagator.clone();
        let clock = self.clock.clone();
        let worker_descriptor = descriptor.clone();

        let handle = thread::Builder::new()
            .name(format!("czml-worker-{}", index))
            .spawn(move || {
                let result =
                    render_satellite(&worker_descriptor, num_steps, propagator, clock.as_ref());
                // receiver is gone once the coordinator gave up on this worker
                let _ = tx.send(result);
            })?;

        Ok(Worker {
            name: descriptor.name.clone(),
            rx,
            handle,
        })
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
