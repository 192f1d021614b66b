use std::sync::Arc;

use super::descriptor::SatelliteDescriptor;
use super::error::PipelineError;
use crate::czml::{assemble, Document};
use crate::propagate::Propagator;
use crate::sampler::{Sampler, TimeSource, TrackSample};

/// Sample one satellite's ground track and assemble its document.
///
/// The propagator is evaluated once per step; the corridor outline is derived from the
/// same samples.
pub fn render_satellite(
    descriptor: &SatelliteDescriptor,
    num_steps: usize,
    propagator: Arc<dyn Propagator>,
    clock: &dyn TimeSource,
) -> Result<Document, PipelineError> {
    let sampler = Sampler::new(descriptor, num_steps, propagator, clock)?;
    let (start, end) = sampler.window();
    log::debug!(
        "Sampling {} ({:.2} min period): {} steps of {:.3}s from {} to {}",
        sampler.satellite(),
        sampler.period_minutes(),
        sampler.num_steps(),
        sampler.timestep(),
        start,
        end
    );

    let steps = sampler.time_steps();
    let track = sampler.ground_track(true, true)?;
    let surface: Vec<TrackSample> = track.iter().map(TrackSample::on_surface).collect();

    let document = assemble(descriptor, &steps, &track, &surface)?;
    log::debug!("Assembled document for {}", document.name());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate::StubPropagator;
    use crate::sampler::{FixedClock, NUM_STEPS};
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    #[test]
    fn iss_example() {
        let propagator = Arc::new(StubPropagator::new().with_satellite("ISS (ZARYA)", 92.5));
        let descriptor = SatelliteDescriptor {
            speed: 120.0,
            orbit_count: 1,
            ..SatelliteDescriptor::named("ISS (ZARYA)")
        };
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

        let doc = render_satellite(&descriptor, NUM_STEPS, propagator, &clock).unwrap();
        let value = doc.to_json();

        assert_eq!(value[0]["clock"]["multiplier"], 120.0);
        assert_eq!(
            value[0]["clock"]["interval"],
            "2024-03-01T12:00:00/2024-03-01T13:32:30"
        );

        let full = value[1]["position"]["cartographicDegrees"].as_array().unwrap();
        assert_eq!(full.len(), 255 * 4);
        assert_relative_eq!(full[4].as_f64().unwrap(), 21.7647, epsilon = 1e-4);
        assert_relative_eq!(full[3].as_f64().unwrap(), 408.0, epsilon = 1e-9);

        let corridor = value[3]["corridor"]["positions"]["cartographicDegrees"]
            .as_array()
            .unwrap();
        assert_eq!(corridor.len(), 255 * 3);
        assert!(corridor.iter().skip(2).step_by(3).all(|alt| *alt == 0.0));
        assert_eq!(corridor[0], full[1]);
        assert_eq!(corridor[1], full[2]);
    }
}
