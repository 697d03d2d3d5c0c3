use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::coordinates::dtos::{CoordinatePayloadDto, CoordinateResponseDto};
use crate::features::coordinates::services::CoordinateService;
use crate::shared::types::ErrorResponse;

/// Create a coordinate
///
/// The server assigns `id`, `created_at` and `updated_at`.
#[utoipa::path(
    post,
    path = "/coordinates/",
    request_body = CoordinatePayloadDto,
    responses(
        (status = 201, description = "Coordinate created", body = CoordinateResponseDto),
        (status = 422, description = "lat/lng missing or out of range", body = ErrorResponse),
        (status = 500, description = "Write was not acknowledged", body = ErrorResponse)
    ),
    tag = "coordinates"
)]
pub async fn create_coordinate(
    State(service): State<Arc<CoordinateService>>,
    AppJson(dto): AppJson<CoordinatePayloadDto>,
) -> Result<(StatusCode, Json<CoordinateResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let coordinate = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(coordinate)))
}

/// Get a coordinate by id
#[utoipa::path(
    get,
    path = "/coordinates/{id}",
    params(
        ("id" = String, Path, description = "Coordinate id")
    ),
    responses(
        (status = 200, description = "Coordinate found", body = CoordinateResponseDto),
        (status = 404, description = "Coordinate not found", body = ErrorResponse)
    ),
    tag = "coordinates"
)]
pub async fn get_coordinate(
    State(service): State<Arc<CoordinateService>>,
    Path(id): Path<String>,
) -> Result<Json<CoordinateResponseDto>> {
    let coordinate = service.get(&id).await?;
    Ok(Json(coordinate))
}

/// List coordinates
///
/// Returns at most 100 records. Order is whatever the database returns and
/// is not stable across calls; there is no pagination.
#[utoipa::path(
    get,
    path = "/coordinates/",
    responses(
        (status = 200, description = "Up to 100 coordinates", body = Vec<CoordinateResponseDto>),
    ),
    tag = "coordinates"
)]
pub async fn list_coordinates(
    State(service): State<Arc<CoordinateService>>,
) -> Result<Json<Vec<CoordinateResponseDto>>> {
    let coordinates = service.list().await?;
    Ok(Json(coordinates))
}

/// Replace a coordinate
///
/// All fields must be sent; an omitted `notes` clears it. Responds 404 when
/// no document was modified, including when the new values equal the old.
#[utoipa::path(
    put,
    path = "/coordinates/{id}",
    params(
        ("id" = String, Path, description = "Coordinate id")
    ),
    request_body = CoordinatePayloadDto,
    responses(
        (status = 200, description = "Coordinate updated", body = CoordinateResponseDto),
        (status = 404, description = "Coordinate not found", body = ErrorResponse),
        (status = 422, description = "lat/lng missing or out of range", body = ErrorResponse)
    ),
    tag = "coordinates"
)]
pub async fn update_coordinate(
    State(service): State<Arc<CoordinateService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<CoordinatePayloadDto>,
) -> Result<Json<CoordinateResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let coordinate = service.update(&id, dto).await?;
    Ok(Json(coordinate))
}

/// Delete a coordinate
#[utoipa::path(
    delete,
    path = "/coordinates/{id}",
    params(
        ("id" = String, Path, description = "Coordinate id")
    ),
    responses(
        (status = 204, description = "Coordinate deleted"),
        (status = 404, description = "Coordinate not found", body = ErrorResponse)
    ),
    tag = "coordinates"
)]
pub async fn delete_coordinate(
    State(service): State<Arc<CoordinateService>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
