use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::locations::dtos::{
    FieldEditResponseDto, FormSessionResponseDto, ManualFieldEditDto, ResolveLocationDto,
    SessionResolutionResponseDto,
};
use crate::features::locations::services::FormSessionService;
use crate::features::regions::models::AdminLevel;
use crate::shared::types::ApiResponse;

/// Create an empty location form session
#[utoipa::path(
    post,
    path = "/api/location-forms",
    responses(
        (status = 201, description = "Session created", body = ApiResponse<FormSessionResponseDto>)
    ),
    tag = "location-forms"
)]
pub async fn create_session(
    State(service): State<Arc<FormSessionService>>,
) -> (StatusCode, Json<ApiResponse<FormSessionResponseDto>>) {
    let session = service.create().await;
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(session.into()), None, None)),
    )
}

#[utoipa::path(
    get,
    path = "/api/location-forms/{id}",
    params(
        ("id" = Uuid, Path, description = "Form session ID")
    ),
    responses(
        (status = 200, description = "Session found", body = ApiResponse<FormSessionResponseDto>),
        (status = 404, description = "Session not found or expired")
    ),
    tag = "location-forms"
)]
pub async fn get_session(
    State(service): State<Arc<FormSessionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FormSessionResponseDto>>> {
    let session = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(session.into()), None, None)))
}

/// Resolve a location and apply it to the session
///
/// The result is only written when this is still the most recently started
/// request for the session and no manual edit happened meanwhile.
#[utoipa::path(
    post,
    path = "/api/location-forms/{id}/resolve",
    params(
        ("id" = Uuid, Path, description = "Form session ID")
    ),
    request_body = ResolveLocationDto,
    responses(
        (status = 200, description = "Resolved; `applied` tells whether the form changed", body = ApiResponse<SessionResolutionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Session not found or expired"),
        (status = 502, description = "Geocoding or regions API unavailable")
    ),
    tag = "location-forms"
)]
pub async fn resolve_into_session(
    State(service): State<Arc<FormSessionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ResolveLocationDto>,
) -> Result<Json<ApiResponse<SessionResolutionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.resolve_and_apply(id, &dto.into_query()?).await?;
    let response = SessionResolutionResponseDto::from(result);

    let message = if !response.applied {
        Some("Superseded by a newer request; form left unchanged".to_string())
    } else if response.resolution.status.needs_review() {
        Some("Please confirm the detected location".to_string())
    } else {
        None
    };

    Ok(Json(ApiResponse::success(Some(response), message, None)))
}

/// Set or clear one field manually
#[utoipa::path(
    put,
    path = "/api/location-forms/{id}/fields/{field}",
    params(
        ("id" = Uuid, Path, description = "Form session ID"),
        ("field" = String, Path, description = "province, regency or district")
    ),
    request_body = ManualFieldEditDto,
    responses(
        (status = 200, description = "Field updated", body = ApiResponse<FieldEditResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Session not found or expired")
    ),
    tag = "location-forms"
)]
pub async fn edit_field(
    State(service): State<Arc<FormSessionService>>,
    Path((id, field)): Path<(Uuid, String)>,
    AppJson(dto): AppJson<ManualFieldEditDto>,
) -> Result<Json<ApiResponse<FieldEditResponseDto>>> {
    let level: AdminLevel = field.parse().map_err(AppError::Validation)?;

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let edit = service.edit_field(id, level, dto.into_value()?).await?;
    Ok(Json(ApiResponse::success(Some(edit.into()), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/location-forms/{id}",
    params(
        ("id" = Uuid, Path, description = "Form session ID")
    ),
    responses(
        (status = 200, description = "Session deleted"),
        (status = 404, description = "Session not found or expired")
    ),
    tag = "location-forms"
)]
pub async fn delete_session(
    State(service): State<Arc<FormSessionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Form session deleted".to_string()),
        None,
    )))
}
