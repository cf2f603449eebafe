use axum::{extract::Path, response::Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::events::{EventResponse, ResolveDepth};
use crate::error::ApiError;
use crate::services::event_service::EventService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    pub user_id: Option<Uuid>,
}

/// POST /api/events/:id/attend - join an event.
/// Joining twice is a duplicate (400); the membership check and append
/// are one atomic update in the service.
pub async fn attend(
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::missing_field("userId"))?;

    let service = EventService::new().await?;
    let event = service.attend(id, user_id).await?;
    let resolved = service.resolve(&event, ResolveDepth::Members).await?;

    Ok(Json(resolved))
}

/// DELETE /api/events/:id/attend - leave an event.
/// Leaving an event you are not attending succeeds and changes nothing.
pub async fn leave(
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::missing_field("userId"))?;

    let service = EventService::new().await?;
    let event = service.leave(id, user_id).await?;
    let resolved = service.resolve(&event, ResolveDepth::Members).await?;

    Ok(Json(resolved))
}
