//! API Routes
//!
//! Configures the Axum router with all product endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_product_handler, delete_product_handler, get_product_handler, health_handler,
    update_product_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /products` - Create a product
/// - `GET /products/:id` - Read a product
/// - `PUT /products/:id` - Partially update a product
/// - `DELETE /products/:id` - Delete a product
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/products", post(create_product_handler))
        .route(
            "/products/:id",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
