use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fulfilment API",
        version = "1.0.0",
        description = r#"
# Fulfilment API

Manages the lifecycle of warehouses hosted at physical locations with a finite
number of slots and a per-warehouse capacity limit.

## Lifecycle

- **Create**: registers an active warehouse under a business unit code
- **Archive**: retires the active warehouse (terminal)
- **Replace**: archives the active warehouse and creates its successor under the
  same business unit code, carrying the stock over

## Error Handling

Errors use a single body shape and map onto status codes by kind:
not found (404), conflict (409), validation (400), internal (500).

```json
{
  "error": "Conflict",
  "message": "Conflict: Warehouse with business unit code 'MWH.001' is already archived.",
  "request_id": "req-abc123xyz",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "warehouses", description = "Warehouse lifecycle endpoints"),
        (name = "locations", description = "Read-only location catalogue")
    ),
    paths(
        crate::handlers::warehouses::list_warehouses,
        crate::handlers::warehouses::get_warehouse,
        crate::handlers::warehouses::create_warehouse,
        crate::handlers::warehouses::archive_warehouse,
        crate::handlers::warehouses::replace_warehouse,
        crate::handlers::locations::list_locations,
        crate::handlers::locations::get_location,
    ),
    components(
        schemas(
            crate::models::Warehouse,
            crate::models::Location,
            crate::handlers::warehouses::CreateWarehouseRequest,
            crate::handlers::warehouses::ReplaceWarehouseRequest,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
