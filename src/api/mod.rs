//! API Module
//!
//! HTTP handlers and routing for the product REST API.
//!
//! # Endpoints
//! - `POST /products` - Create a product
//! - `GET /products/:id` - Read a product (cache-aside)
//! - `PUT /products/:id` - Partially update a product
//! - `DELETE /products/:id` - Delete a product
//! - `GET /health` - Liveness check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
