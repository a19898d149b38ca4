use crate::{
    errors::ServiceError, models::Location, services::locations::LocationResolver, ApiResponse,
    ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    response::Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Location catalogue", body = ApiResponse<Vec<Location>>)
    ),
    tag = "locations"
)]
pub async fn list_locations(State(state): State<AppState>) -> ApiResult<Vec<Location>> {
    Ok(Json(ApiResponse::success(state.locations.all().to_vec())))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{identification}",
    params(
        ("identification" = String, Path, description = "Location identifier")
    ),
    responses(
        (status = 200, description = "Location limits", body = ApiResponse<Location>),
        (status = 404, description = "Unknown location", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(identification): Path<String>,
) -> ApiResult<Location> {
    state
        .locations
        .resolve_by_identifier(&identification)
        .map(|location| Json(ApiResponse::success(location)))
        .ok_or_else(|| ServiceError::NotFound(format!("Location '{}' does not exist.", identification)))
}
