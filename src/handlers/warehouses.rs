use crate::{
    commands::warehouses::{CreateWarehouseCommand, ReplaceWarehouseCommand},
    handlers::JsonBody,
    models::Warehouse,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "business_unit_code": "MWH.001",
    "location": "ZWOLLE-001",
    "capacity": 40,
    "stock": 10
}))]
pub struct CreateWarehouseRequest {
    /// Business unit code, unique among active warehouses
    #[schema(example = "MWH.001")]
    pub business_unit_code: String,
    /// Identifier of the hosting location
    #[schema(example = "ZWOLLE-001")]
    pub location: String,
    /// Maximum stock units
    #[schema(example = 40)]
    pub capacity: i32,
    /// Current stock units, 0 when omitted
    #[schema(example = 10)]
    pub stock: Option<i32>,
}

impl From<CreateWarehouseRequest> for CreateWarehouseCommand {
    fn from(request: CreateWarehouseRequest) -> Self {
        Self {
            business_unit_code: request.business_unit_code,
            location: request.location,
            capacity: request.capacity,
            stock: request.stock,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "location": "AMSTERDAM-001",
    "capacity": 80,
    "stock": 10
}))]
pub struct ReplaceWarehouseRequest {
    /// Location of the replacement warehouse
    #[schema(example = "AMSTERDAM-001")]
    pub location: String,
    /// Capacity of the replacement; must hold the current stock
    #[schema(example = 80)]
    pub capacity: i32,
    /// Must equal the stock of the warehouse being replaced
    #[schema(example = 10)]
    pub stock: Option<i32>,
}

impl ReplaceWarehouseRequest {
    fn into_command(self, business_unit_code: String) -> ReplaceWarehouseCommand {
        ReplaceWarehouseCommand {
            business_unit_code,
            location: self.location,
            capacity: self.capacity,
            stock: self.stock,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses",
    responses(
        (status = 200, description = "All warehouse records, archived included", body = ApiResponse<Vec<Warehouse>>)
    ),
    tag = "warehouses"
)]
pub async fn list_warehouses(State(state): State<AppState>) -> ApiResult<Vec<Warehouse>> {
    let warehouses = state.warehouse_service.list_warehouses().await?;
    Ok(Json(ApiResponse::success(warehouses)))
}

#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{business_unit_code}",
    params(
        ("business_unit_code" = String, Path, description = "Business unit code")
    ),
    responses(
        (status = 200, description = "Active warehouse, or the latest archived one", body = ApiResponse<Warehouse>),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(business_unit_code): Path<String>,
) -> ApiResult<Warehouse> {
    let warehouse = state
        .warehouse_service
        .get_warehouse(&business_unit_code)
        .await?;
    Ok(Json(ApiResponse::success(warehouse)))
}

#[utoipa::path(
    post,
    path = "/api/v1/warehouses",
    request_body = CreateWarehouseRequest,
    responses(
        (status = 201, description = "Warehouse created", body = ApiResponse<Warehouse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code in use or location full", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn create_warehouse(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Warehouse>>), crate::errors::ServiceError> {
    let created = state
        .warehouse_service
        .create_warehouse(payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/warehouses/{business_unit_code}",
    params(
        ("business_unit_code" = String, Path, description = "Business unit code")
    ),
    responses(
        (status = 204, description = "Warehouse archived"),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Warehouse already archived", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn archive_warehouse(
    State(state): State<AppState>,
    Path(business_unit_code): Path<String>,
) -> Result<StatusCode, crate::errors::ServiceError> {
    state
        .warehouse_service
        .archive_warehouse(&business_unit_code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/warehouses/{business_unit_code}/replacement",
    request_body = ReplaceWarehouseRequest,
    params(
        ("business_unit_code" = String, Path, description = "Business unit code of the warehouse to replace")
    ),
    responses(
        (status = 200, description = "Replacement warehouse", body = ApiResponse<Warehouse>),
        (status = 400, description = "Replacement rules violated", body = crate::errors::ErrorResponse),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Warehouse archived or target location full", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn replace_warehouse(
    State(state): State<AppState>,
    Path(business_unit_code): Path<String>,
    JsonBody(payload): JsonBody<ReplaceWarehouseRequest>,
) -> ApiResult<Warehouse> {
    let replacement = state
        .warehouse_service
        .replace_warehouse(payload.into_command(business_unit_code))
        .await?;
    Ok(Json(ApiResponse::success(replacement)))
}
