use serde::Serialize;
use utoipa::ToSchema;

/// Information about a single satellite from TLE
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub tle_source: String,
}

/// Sub-satellite point on the WGS-84 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub altitude_km: f64,
}
