use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::clock::TimeSource;
use super::error::SamplerError;
use super::types::{TimeStep, TrackSample};
use crate::constellation::SatelliteDescriptor;
use crate::propagate::Propagator;

/// Default number of samples per window
pub const NUM_STEPS: usize = 255;

const SECONDS_PER_MINUTE: f64 = 60.0;
const METERS_PER_KM: f64 = 1000.0;
const NANOS_PER_SECOND: f64 = 1e9;

/// Fixed-cardinality sampler over `orbit_count` orbits of one satellite.
///
/// The window anchor is read from the clock once, at construction, so
/// `time_steps` and `ground_track` always describe the same window.
pub struct Sampler {
    satellite: String,
    propagator: Arc<dyn Propagator>,
    period_minutes: f64,
    orbit_count: u32,
    num_steps: usize,
    anchor: DateTime<Utc>,
}

impl Sampler {
    pub fn new(
        descriptor: &SatelliteDescriptor,
        num_steps: usize,
        propagator: Arc<dyn Propagator>,
        clock: &dyn TimeSource,
    ) -> Result<Self, SamplerError> {
        if num_steps == 0 {
            return Err(SamplerError::NoSteps);
        }

        let period_minutes = propagator.period_minutes(&descriptor.name)?;
        if !period_minutes.is_finite() || period_minutes <= 0.0 {
            return Err(SamplerError::InvalidPeriod {
                satellite: descriptor.name.clone(),
                minutes: period_minutes,
            });
        }

        let anchor = clock.now();
        let window_s = period_minutes * f64::from(descriptor.orbit_count) * SECONDS_PER_MINUTE;
        let window_ns = window_s * NANOS_PER_SECOND;
        // every boundary offset must fit in i64 nanoseconds and land on a representable instant
        let end = if window_ns < i64::MAX as f64 {
            anchor.checked_add_signed(Duration::nanoseconds(window_ns.round() as i64))
        } else {
            None
        };
        if end.is_none() {
            return Err(SamplerError::WindowTooLong {
                satellite: descriptor.name.clone(),
                seconds: window_s,
            });
        }

        Ok(Self {
            satellite: descriptor.name.clone(),
            propagator,
            period_minutes,
            orbit_count: descriptor.orbit_count,
            num_steps,
            anchor,
        })
    }

    pub fn satellite(&self) -> &str {
        &self.satellite
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Period of a single orbit, in minutes
    pub fn period_minutes(&self) -> f64 {
        self.period_minutes
    }

    /// Duration of one step, in seconds
    pub fn timestep(&self) -> f64 {
        (self.period_minutes * f64::from(self.orbit_count) / self.num_steps as f64)
            * SECONDS_PER_MINUTE
    }

    /// `num_steps` contiguous steps starting at the anchor
    pub fn time_steps(&self) -> Vec<TimeStep> {
        (0..self.num_steps)
            .map(|i| TimeStep {
                start_time: self.step_boundary(i),
                end_time: self.step_boundary(i + 1),
            })
            .collect()
    }

    /// Window covered by all steps: start of the first, end of the last
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.anchor, self.step_boundary(self.num_steps))
    }

    /// Propagates once per step at the step's start time.
    ///
    /// `time` adds the elapsed seconds since the first step; `altitude` keeps the
    /// propagated altitude in meters, otherwise it is zeroed.
    pub fn ground_track(
        &self,
        time: bool,
        altitude: bool,
    ) -> Result<Vec<TrackSample>, SamplerError> {
        let timestep = self.timestep();
        let mut duration = 0.0;
        let mut track = Vec::with_capacity(self.num_steps);

        for step in self.time_steps() {
            let position = self
                .propagator
                .geodetic_position(&self.satellite, step.start_time)?;

            track.push(TrackSample {
                elapsed_s: time.then_some(duration),
                longitude_deg: position.longitude_deg,
                latitude_deg: position.latitude_deg,
                altitude_m: if altitude {
                    position.altitude_km * METERS_PER_KM
                } else {
                    0.0
                },
            });
            duration += timestep;
        }

        Ok(track)
    }

    // computed from the anchor so boundaries never accumulate rounding error
    fn step_boundary(&self, index: usize) -> DateTime<Utc> {
        let offset_ns = (index as f64 * self.timestep() * NANOS_PER_SECOND).round() as i64;
        self.anchor + Duration::nanoseconds(offset_ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate::{PropagateError, StubPropagator};
    use crate::sampler::FixedClock;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn sampler(name: &str, period: f64, orbit_count: u32, num_steps: usize) -> Sampler {
        let propagator = Arc::new(StubPropagator::new().with_satellite(name, period));
        let descriptor = SatelliteDescriptor {
            orbit_count,
            ..SatelliteDescriptor::named(name)
        };
        Sampler::new(&descriptor, num_steps, propagator, &FixedClock(anchor())).unwrap()
    }

    #[test]
    fn steps_cover_period_times_orbit_count() {
        for orbit_count in 1..=3 {
            let s = sampler("SAT", 92.5, orbit_count, NUM_STEPS);
            let total: f64 = s
                .time_steps()
                .iter()
                .map(|step| {
                    (step.end_time - step.start_time).num_nanoseconds().unwrap() as f64 / 1e9
                })
                .sum();
            assert_relative_eq!(total, 92.5 * 60.0 * orbit_count as f64, epsilon = 1e-6);
        }
    }

    #[test]
    fn steps_are_contiguous() {
        let steps = sampler("SAT", 92.5, 1, NUM_STEPS).time_steps();
        assert_eq!(steps.len(), 255);
        assert_eq!(steps[0].start_time, anchor());
        for pair in steps.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
            assert!(pair[0].start_time < pair[0].end_time);
        }
    }

    #[test]
    fn iss_timestep() {
        let s = sampler("ISS (ZARYA)", 92.5, 1, NUM_STEPS);
        assert_relative_eq!(s.timestep(), 21.7647, epsilon = 1e-4);
        let (start, end) = s.window();
        assert_eq!(start, anchor());
        assert_eq!(end, s.time_steps().last().unwrap().end_time);
    }

    #[test]
    fn full_track_arity_and_elapsed() {
        let s = sampler("SAT", 92.5, 1, NUM_STEPS);
        let track = s.ground_track(true, true).unwrap();
        assert_eq!(track.len(), 255);
        assert_eq!(track.iter().map(TrackSample::arity).sum::<usize>(), 255 * 4);
        assert_eq!(track[0].elapsed_s, Some(0.0));
        assert_relative_eq!(track[1].elapsed_s.unwrap(), s.timestep());
        assert_relative_eq!(track[254].elapsed_s.unwrap(), 254.0 * s.timestep(), epsilon = 1e-9);
    }

    #[test]
    fn altitude_is_scaled_to_meters() {
        let track = sampler("SAT", 92.5, 1, 4).ground_track(true, true).unwrap();
        assert!(track.iter().all(|p| (p.altitude_m - 408.0).abs() < 1e-9));
    }

    #[test]
    fn suppressed_fields() {
        let track = sampler("SAT", 92.5, 1, NUM_STEPS).ground_track(false, false).unwrap();
        assert_eq!(track.len(), 255);
        assert!(track.iter().all(|p| p.elapsed_s.is_none() && p.altitude_m == 0.0));
        assert_eq!(track.iter().map(TrackSample::arity).sum::<usize>(), 255 * 3);
    }

    #[test]
    fn configurable_resolution() {
        let s = sampler("SAT", 100.0, 2, 10);
        assert_eq!(s.time_steps().len(), 10);
        assert_relative_eq!(s.timestep(), 1200.0);
        assert_eq!(s.ground_track(true, false).unwrap().len(), 10);
    }

    #[test]
    fn unknown_satellite_fails_fast() {
        let propagator = Arc::new(StubPropagator::new());
        let err = Sampler::new(
            &SatelliteDescriptor::named("GHOST"),
            NUM_STEPS,
            propagator,
            &FixedClock(anchor()),
        )
        .err()
        .unwrap();
        assert!(err.is_lookup());
        assert!(matches!(
            err,
            SamplerError::Propagate(PropagateError::SatelliteNotFound(ref n)) if n == "GHOST"
        ));
    }

    #[test]
    fn rejects_bad_period_and_zero_steps() {
        let propagator: Arc<dyn Propagator> =
            Arc::new(StubPropagator::new().with_satellite("SAT", 0.0));
        let descriptor = SatelliteDescriptor::named("SAT");
        let clock = FixedClock(anchor());
        assert!(matches!(
            Sampler::new(&descriptor, NUM_STEPS, propagator.clone(), &clock),
            Err(SamplerError::InvalidPeriod { .. })
        ));
        assert!(matches!(
            Sampler::new(&descriptor, 0, propagator, &clock),
            Err(SamplerError::NoSteps)
        ));
    }

    #[test]
    fn rejects_window_beyond_nanosecond_range() {
        let propagator: Arc<dyn Propagator> =
            Arc::new(StubPropagator::new().with_satellite("SAT", 92.5));
        let descriptor = SatelliteDescriptor {
            orbit_count: 10_000_000,
            ..SatelliteDescriptor::named("SAT")
        };
        let err = Sampler::new(&descriptor, NUM_STEPS, propagator, &FixedClock(anchor()))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SamplerError::WindowTooLong { ref satellite, seconds }
                if satellite == "SAT" && (seconds - 92.5 * 60.0 * 1e7).abs() < 1.0
        ));
    }

    #[test]
    fn long_window_keeps_full_duration() {
        // 100k orbits of 92.5 min is about 17.6 years, well inside the range
        let s = sampler("SAT", 92.5, 100_000, NUM_STEPS);
        let steps = s.time_steps();
        let total_ms = (steps[254].end_time - steps[0].start_time).num_milliseconds();
        assert!((total_ms - 555_000_000_000).abs() <= 1);
        assert!(steps.iter().all(|step| step.start_time < step.end_time));
    }
}
