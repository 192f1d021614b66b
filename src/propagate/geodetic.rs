use chrono::{DateTime, Utc};

use crate::propagate::types::Geodetic;

// WGS-84
const SEMI_MAJOR_AXIS_KM: f64 = 6378.137;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const MAX_ITERATIONS: usize = 10;
const LATITUDE_TOLERANCE_RAD: f64 = 1e-12;

/// Greenwich mean sidereal time in radians
pub fn sidereal_time(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Iterative ECEF (km) to geodetic conversion. Longitude is normalised to [-180, 180).
pub fn ecef_to_geodetic(pos_ecef: [f64; 3]) -> Geodetic {
    let [x, y, z] = pos_ecef;
    let e2 = FLATTENING * (2.0 - FLATTENING);
    let p = (x * x + y * y).sqrt();

    let longitude = y.atan2(x);
    let mut latitude = z.atan2(p * (1.0 - e2));
    let mut n = SEMI_MAJOR_AXIS_KM;

    for _ in 0..MAX_ITERATIONS {
        let sin_lat = latitude.sin();
        n = SEMI_MAJOR_AXIS_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + e2 * n * sin_lat).atan2(p);
        let delta = (next - latitude).abs();
        latitude = next;
        if delta < LATITUDE_TOLERANCE_RAD {
            break;
        }
    }

    let cos_lat = latitude.cos();
    let altitude_km = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        // polar: measure along the minor axis
        z.abs() - SEMI_MAJOR_AXIS_KM * (1.0 - FLATTENING)
    };

    Geodetic {
        longitude_deg: normalize_longitude(longitude.to_degrees()),
        latitude_deg: latitude.to_degrees(),
        altitude_km,
    }
}

fn normalize_longitude(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}
