use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dtos::{AuthRequest, CategoryDto, ProductDto, TokenResponse};

/// OpenAPI document served at /api-docs/openapi.json and rendered by the
/// Swagger UI. The v2 group mirrors v1 except for the state probe, so only
/// the v1 paths (plus the probe) are documented.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        description = "Product catalog CRUD API with JWT bearer authentication and pagination"
    ),
    paths(
        crate::handlers::auth::authenticate,
        crate::handlers::auth::state,
        crate::handlers::categories::list,
        crate::handlers::categories::list_with_products,
        crate::handlers::categories::get_by_id,
        crate::handlers::categories::create,
        crate::handlers::categories::update,
        crate::handlers::categories::remove,
        crate::handlers::products::list,
        crate::handlers::products::list_by_price,
        crate::handlers::products::get_by_id,
        crate::handlers::products::create,
        crate::handlers::products::update,
        crate::handlers::products::remove,
    ),
    components(schemas(AuthRequest, TokenResponse, CategoryDto, ProductDto)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token issuance"),
        (name = "Categories", description = "Categories CRUD"),
        (name = "Products", description = "Products CRUD")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
