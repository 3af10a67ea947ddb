use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::database::models::Product;
use crate::database::UnitOfWork;
use crate::dtos::ProductDto;
use crate::error::ApiError;
use crate::handlers::categories::pagination_header;
use crate::pagination::PageParams;
use crate::routes::AppState;

/// GET /Products - paginated products ordered by id
#[utoipa::path(
    get,
    path = "/api/v1/Products",
    tag = "Products",
    params(PageParams),
    responses(
        (status = 200, description = "One page of products, metadata in the X-Pagination header", body = [ProductDto]),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = UnitOfWork::new(state.pool.clone());
    let page = unit.products().paged(&params).await?;

    let headers = pagination_header(&page.metadata())?;
    let body: Vec<ProductDto> = page.items.into_iter().map(ProductDto::from).collect();

    Ok((headers, Json(body)))
}

/// GET /Products/price - all products ordered by ascending price
#[utoipa::path(
    get,
    path = "/api/v1/Products/price",
    tag = "Products",
    responses(
        (status = 200, description = "All products sorted by price", body = [ProductDto]),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_by_price(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let unit = UnitOfWork::new(state.pool.clone());
    let products = unit.products().list_by_price().await?;

    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// GET /Products/{id}
#[utoipa::path(
    get,
    path = "/api/v1/Products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, body = ProductDto),
        (status = 404, description = "No product with this id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDto>, ApiError> {
    let unit = UnitOfWork::new(state.pool.clone());
    let product = unit
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product {} not found", id)))?;

    Ok(Json(ProductDto::from(product)))
}

/// POST /Products - register a new product
#[utoipa::path(
    post,
    path = "/api/v1/Products",
    tag = "Products",
    request_body = ProductDto,
    responses(
        (status = 201, description = "Created, Location header references the new product", body = ProductDto),
        (status = 400, description = "Validation failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<ProductDto>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(dto) = body?;
    dto.validate()?;

    let unit = UnitOfWork::new(state.pool.clone());
    let staged = unit.products().add(Product::from(dto));
    unit.commit().await?;

    let created = ProductDto::from(staged.entity());
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), created.product_id);
    let location = HeaderValue::from_str(&location)
        .map_err(|_| ApiError::internal_server_error("Failed to build Location header"))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// PUT /Products/{id} - full replace, responds 204 on success
#[utoipa::path(
    put,
    path = "/api/v1/Products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductDto,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Route/body id mismatch or validation failure"),
        (status = 404, description = "No product with this id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Result<Json<ProductDto>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(dto) = body?;
    if id != dto.product_id {
        return Err(ApiError::bad_request("Route id does not match product id"));
    }
    dto.validate()?;

    let unit = UnitOfWork::new(state.pool.clone());
    if unit.products().get_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(format!("Product {} not found", id)));
    }

    unit.products().update(Product::from(dto));
    unit.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /Products/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/Products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted product", body = ProductDto),
        (status = 404, description = "No product with this id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDto>, ApiError> {
    let unit = UnitOfWork::new(state.pool.clone());
    let product = unit
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product {} not found", id)))?;

    unit.products().delete(product.clone());
    unit.commit().await?;

    Ok(Json(ProductDto::from(product)))
}
