use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{Method, StatusCode, Uri},
    routing::{get, patch},
    Json, Router,
};
use server_api::{create_product, list_products, update_product};
use shared::{
    domain::{NewProduct, Product, ProductPatch},
    error::{ApiError, ErrorCode},
    protocol::{parse_product_id, products_route},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::debug;

use crate::app_state::AppState;

type ApiResponse<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

pub fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz).fallback(route_not_found))
        .route(
            products_route(),
            get(http_list_products)
                .post(http_create_product)
                .fallback(route_not_found),
        )
        .route(
            &format!("{}/:id", products_route()),
            patch(http_update_product).fallback(route_not_found),
        )
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn route_not_found(method: Method, uri: Uri) -> (StatusCode, Json<ApiError>) {
    debug!(%method, %uri, "no route matched");
    error_response(ApiError::route_not_found())
}

async fn http_list_products(State(state): State<Arc<AppState>>) -> ApiResponse<Vec<Product>> {
    let products = list_products(&state.api).await.map_err(error_response)?;
    Ok(Json(products))
}

async fn http_create_product(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResponse<Product> {
    let Json(new) = body.map_err(rejection_response)?;
    let product = create_product(&state.api, new)
        .await
        .map_err(error_response)?;
    Ok(Json(product))
}

async fn http_update_product(
    State(state): State<Arc<AppState>>,
    raw_id: Result<Path<String>, PathRejection>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> ApiResponse<Product> {
    let id = raw_id
        .ok()
        .and_then(|Path(raw_id)| parse_product_id(&raw_id))
        .ok_or_else(|| error_response(ApiError::route_not_found()))?;
    let Json(patch) = body.map_err(rejection_response)?;
    let product = update_product(&state.api, id, patch)
        .await
        .map_err(error_response)?;
    Ok(Json(product))
}

fn error_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

fn rejection_response(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    (
        rejection.status(),
        Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
    )
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
