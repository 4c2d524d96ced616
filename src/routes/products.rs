use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    dto::products::{CreateProductRequest, ProductList, ProductView, UpdateProductRequest},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_product))
        .route("/", axum::routing::get(list_products))
        .route("/{id}", axum::routing::get(get_product))
        .route("/{id}", axum::routing::put(update_product))
        .route("/{id}", axum::routing::delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive name filter; blank lists everything"),
    ),
    responses(
        (status = 200, description = "Products, most recently updated first", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let search = query.search_term();
    let live = match search {
        Some(q) => product_service::search_products(&state, q),
        None => product_service::get_products(&state),
    };
    let items: Vec<ProductView> = live.snapshot().await?.into_iter().map(Into::into).collect();

    let meta = Meta::listing(items.len(), search.map(str::to_string));
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductView>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProductView>>> {
    let product = product_service::get_product(&state, id)
        .snapshot()
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success("Product", product.into(), None)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductView>),
        (status = 400, description = "Validation failed"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductView>>)> {
    let id = product_service::add_product(&state, payload.into_product()).await?;
    let product = product_service::get_product(&state, id)
        .snapshot()
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Product created",
            product.into(),
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<ProductView>),
        (status = 400, description = "Validation failed or unknown product"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductView>>> {
    let mut product = product_service::get_product(&state, id)
        .snapshot()
        .await?
        .ok_or_else(|| AppError::validation(format!("Product {id} does not exist")))?;

    payload.apply(&mut product);
    product_service::update_product(&state, product).await?;

    let product = product_service::get_product(&state, id)
        .snapshot()
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success(
        "Updated",
        product.into(),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted; also returned when the product was already gone"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    product_service::delete_product(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    )))
}
