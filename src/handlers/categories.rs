use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::database::models::Category;
use crate::database::UnitOfWork;
use crate::dtos::CategoryDto;
use crate::error::ApiError;
use crate::pagination::{PageMetadata, PageParams};
use crate::routes::AppState;

/// Number of products returned per category on the nested listing
const SAMPLE_PRODUCTS_PER_CATEGORY: i64 = 2;

pub(crate) fn pagination_header(metadata: &PageMetadata) -> Result<HeaderMap, ApiError> {
    let json = serde_json::to_string(metadata)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to format metadata: {e}")))?;
    let value = HeaderValue::from_str(&json)
        .map_err(|_| ApiError::internal_server_error("Failed to format metadata header"))?;

    let mut headers = HeaderMap::new();
    headers.insert("x-pagination", value);
    Ok(headers)
}

/// GET /Categories - paginated categories ordered by id
#[utoipa::path(
    get,
    path = "/api/v1/Categories",
    tag = "Categories",
    params(PageParams),
    responses(
        (status = 200, description = "One page of categories, metadata in the X-Pagination header", body = [CategoryDto]),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = UnitOfWork::new(state.pool.clone());
    let page = unit.categories().paged(&params).await?;

    let headers = pagination_header(&page.metadata())?;
    let body: Vec<CategoryDto> = page.items.into_iter().map(CategoryDto::from).collect();

    Ok((headers, Json(body)))
}

/// GET /Categories/products - all categories with their first products
#[utoipa::path(
    get,
    path = "/api/v1/Categories/products",
    tag = "Categories",
    responses(
        (status = 200, description = "Categories each with up to two products", body = [CategoryDto]),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_with_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let unit = UnitOfWork::new(state.pool.clone());
    let categories = unit
        .categories()
        .with_products(SAMPLE_PRODUCTS_PER_CATEGORY)
        .await?;

    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

/// GET /Categories/{id}
#[utoipa::path(
    get,
    path = "/api/v1/Categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, body = CategoryDto),
        (status = 404, description = "No category with this id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryDto>, ApiError> {
    let unit = UnitOfWork::new(state.pool.clone());
    let category = unit
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category {} not found", id)))?;

    Ok(Json(CategoryDto::from(category)))
}

/// POST /Categories - register a new category
#[utoipa::path(
    post,
    path = "/api/v1/Categories",
    tag = "Categories",
    request_body = CategoryDto,
    responses(
        (status = 201, description = "Created, Location header references the new category", body = CategoryDto),
        (status = 400, description = "Validation failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<CategoryDto>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(dto) = body?;
    dto.validate()?;

    let unit = UnitOfWork::new(state.pool.clone());
    let staged = unit.categories().add(Category::from(dto));
    unit.commit().await?;

    let created = CategoryDto::from(staged.entity());
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), created.category_id);
    let location = HeaderValue::from_str(&location)
        .map_err(|_| ApiError::internal_server_error("Failed to build Location header"))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// PUT /Categories/{id} - full replace
#[utoipa::path(
    put,
    path = "/api/v1/Categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryDto,
    responses(
        (status = 200, description = "Updated category", body = CategoryDto),
        (status = 400, description = "Route/body id mismatch or validation failure"),
        (status = 404, description = "No category with this id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Result<Json<CategoryDto>, JsonRejection>,
) -> Result<Json<CategoryDto>, ApiError> {
    let Json(dto) = body?;
    if id != dto.category_id {
        return Err(ApiError::bad_request("Route id does not match category id"));
    }
    dto.validate()?;

    let unit = UnitOfWork::new(state.pool.clone());
    if unit.categories().get_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(format!("Category {} not found", id)));
    }

    unit.categories().update(Category::from(dto.clone()));
    unit.commit().await?;

    Ok(Json(dto))
}

/// DELETE /Categories/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/Categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Deleted category", body = CategoryDto),
        (status = 404, description = "No category with this id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryDto>, ApiError> {
    let unit = UnitOfWork::new(state.pool.clone());
    let category = unit
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category {} not found", id)))?;

    unit.categories().delete(category.clone());
    unit.commit().await?;

    Ok(Json(CategoryDto::from(category)))
}
