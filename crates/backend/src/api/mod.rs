use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use dumpwatch_shared::coords::{self, MAP_HEIGHT_PX, MAP_WIDTH_PX};
use dumpwatch_shared::error::MalformedCoordinateError;
use dumpwatch_shared::models::{Incident, IncidentStatus, NewIncident, StatusUpdate};

use crate::storage::Storage;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("incident {0} not found")]
    NotFound(String),
    #[error(transparent)]
    MalformedCoordinates(#[from] MalformedCoordinateError),
    #[error("coordinates ({x}, {y}) fall outside the map")]
    OutOfBounds { x: f64, y: f64 },
    #[error("storage error: {0}")]
    Storage(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MalformedCoordinates(_) | ApiError::OutOfBounds { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "Storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// REST routes for the incident collection.
pub fn router(storage: Arc<Storage>) -> Router {
    Router::new()
        .route("/api/incidents", get(list_incidents).post(create_incident))
        .route(
            "/api/incidents/{id}",
            get(get_incident).patch(update_incident),
        )
        .with_state(storage)
}

async fn list_incidents(
    State(storage): State<Arc<Storage>>,
) -> Result<Json<Vec<Incident>>, ApiError> {
    let incidents = storage.list_incidents().map_err(ApiError::Storage)?;
    Ok(Json(incidents))
}

async fn get_incident(
    State(storage): State<Arc<Storage>>,
    Path(id): Path<String>,
) -> Result<Json<Incident>, ApiError> {
    storage
        .get_incident(&id)
        .map_err(ApiError::Storage)?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

async fn create_incident(
    State(storage): State<Arc<Storage>>,
    Json(input): Json<NewIncident>,
) -> Result<(StatusCode, Json<Incident>), ApiError> {
    let pos = coords::parse_packed_coordinates(&input.coordinates)?;
    if !(0.0..=MAP_WIDTH_PX).contains(&pos.x) || !(0.0..=MAP_HEIGHT_PX).contains(&pos.y) {
        return Err(ApiError::OutOfBounds { x: pos.x, y: pos.y });
    }

    let incident = Incident {
        id: uuid::Uuid::new_v4().to_string(),
        coordinates: coords::format_packed_coordinates(pos),
        status: IncidentStatus::Reported,
        description: input.description.trim().to_string(),
        reported_at: Some(chrono::Utc::now().to_rfc3339()),
        resolved_at: None,
    };
    storage.save_incident(&incident).map_err(ApiError::Storage)?;
    tracing::info!(id = %incident.id, coordinates = %incident.coordinates, "Incident reported");

    Ok((StatusCode::CREATED, Json(incident)))
}

async fn update_incident(
    State(storage): State<Arc<Storage>>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Incident>, ApiError> {
    let now = chrono::Utc::now().to_rfc3339();
    let incident = storage
        .update_status(&id, update.status, &now)
        .map_err(ApiError::Storage)?
        .ok_or(ApiError::NotFound(id))?;
    tracing::info!(id = %incident.id, status = %incident.status, "Incident status updated");
    Ok(Json(incident))
}
