//! Product handlers.
//!
//! Reads are public; mutating routes sit behind the authentication
//! middleware, and creation additionally requires the `user` role.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};

use crate::api::middleware::{auth_middleware, require_role, CurrentUser};
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::ROLE_USER;
use crate::domain::{Product, ProductData};
use crate::errors::AppResult;

/// Create product routes.
///
/// The guarded sub-router carries the auth middleware; it is merged with
/// the public read routes so the guards run before any mutating handler.
pub fn product_routes(state: AppState) -> Router<AppState> {
    let guarded = Router::new()
        .route("/", post(create_product))
        .route(
            "/:id",
            put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
        .merge(guarded)
}

/// List all products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    responses(
        (status = 200, description = "All registered products", body = Vec<Product>)
    )
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.product_service.get_products().await?;
    Ok(Json(products))
}

/// Get product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "The requested product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = state.product_service.get_product(id).await?;
    Ok(Json(product))
}

/// Register a new product (requires the `user` role)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = ProductData,
    responses(
        (status = 201, description = "Product registered", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires the user role")
    )
)]
pub async fn create_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductData>,
) -> AppResult<(StatusCode, Json<Product>)> {
    require_role(&current_user, ROLE_USER)?;

    let product = state.product_service.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (any authenticated principal)
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductData,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ProductData>,
) -> AppResult<Json<Product>> {
    let product = state.product_service.update_product(id, payload).await?;
    Ok(Json(product))
}

/// Delete a product (any authenticated principal)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.product_service.delete_product(id).await?;
    Ok(StatusCode::OK)
}
