//! API Handlers
//!
//! HTTP request handlers for each product endpoint. Handlers only translate
//! between HTTP and `ProductService`; the cache-aside protocol lives there.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::ProductCache;
use crate::error::{Result, ServiceError};
use crate::models::{HealthResponse, NewProduct, Product, ProductUpdate};
use crate::service::ProductService;
use crate::store::ProductRepository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside product service
    pub service: ProductService,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: ProductService) -> Self {
        Self { service }
    }

    /// Creates a new AppState from a record store and a cache layer.
    pub fn from_parts(store: Arc<dyn ProductRepository>, cache: ProductCache) -> Self {
        Self::new(ProductService::new(store, cache))
    }
}

/// Unwraps a JSON body. An oversized body is a 413; every other rejection
/// (bad syntax, wrong types, missing content type) is a 400.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServiceError::PayloadTooLarge(rejection.body_text())
        } else {
            ServiceError::InvalidRequest(rejection.body_text())
        }
    })
}

/// Handler for POST /products
pub async fn create_product_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let req = json_body(payload)?;
    let product = state.service.create(req).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for GET /products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = state.service.get(&id).await?;

    Ok(Json(product))
}

/// Handler for PUT /products/:id
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Product>> {
    let req = json_body(payload)?;
    let product = state.service.update(&id, req).await?;

    Ok(Json(product))
}

/// Handler for DELETE /products/:id
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /health
///
/// Liveness only; reachability of the cache and store is not checked.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
