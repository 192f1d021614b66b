use utoipa::OpenApi;

use super::api::czml::ConfiguredSatellite;
use super::api::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::czml::constellation_czml,
        super::api::czml::satellite_czml,
        super::api::czml::list_satellites,
    ),
    components(
        schemas(
            ConfiguredSatellite,
            ErrorResponse,
            crate::propagate::SatelliteInfo,
        )
    ),
    info(
        title = "Sat-CZML API",
        description = "CZML ground tracks for a configured satellite constellation",
        version = "0.1.0"
    ),
    tags(
        (name = "czml", description = "Constellation rendering")
    )
)]
pub struct ApiDoc;
