use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::czml::Document;
use crate::propagate::SatelliteInfo;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfiguredSatellite {
    pub name: String,
    pub speed: f64,
    pub orbit_count: u32,
    /// Matching TLE, if the catalog has one
    pub catalog: Option<SatelliteInfo>,
}

#[utoipa::path(
    get,
    path = "/api/czml",
    tag = "czml",
    responses(
        (status = 200, description = "CZML documents keyed by satellite name"),
        (status = 500, description = "At least one satellite failed", body = ErrorResponse)
    )
)]
pub async fn constellation_czml(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<String, Document>>> {
    let constellation = state.constellation.clone();
    let documents = tokio::task::spawn_blocking(move || constellation.execute()).await??;
    Ok(Json(documents))
}

#[utoipa::path(
    get,
    path = "/api/czml/{name}",
    tag = "czml",
    params(
        ("name" = String, Path, description = "Configured satellite name")
    ),
    responses(
        (status = 200, description = "CZML document for one satellite"),
        (status = 404, description = "Satellite not configured or not in the TLE catalog", body = ErrorResponse),
        (status = 504, description = "Worker timed out", body = ErrorResponse)
    )
)]
pub async fn satellite_czml(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Document>> {
    let constellation = state.constellation.clone();
    let requested = name.clone();
    let outcome =
        tokio::task::spawn_blocking(move || constellation.execute_one(&requested)).await?;

    match outcome {
        None => Err(ApiError::NotFound(name)),
        Some(result) => Ok(Json(result?)),
    }
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    tag = "czml",
    responses(
        (status = 200, description = "Configured satellites", body = Vec<ConfiguredSatellite>)
    )
)]
pub async fn list_satellites(State(state): State<AppState>) -> Json<Vec<ConfiguredSatellite>> {
    let catalog = state.propagator.catalog();
    let satellites = state
        .constellation
        .satellites()
        .iter()
        .map(|d| ConfiguredSatellite {
            name: d.name.clone(),
            speed: d.speed,
            orbit_count: d.orbit_count,
            catalog: catalog.get(&d.name).ok().map(|entry| entry.info.clone()),
        })
        .collect();
    Json(satellites)
}
