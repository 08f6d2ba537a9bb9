//! Domain and transfer types for the product API
//!
//! `Product` is the record owned by the store; the request types double as
//! the store's create and partial-update inputs.

pub mod product;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use product::Product;
pub use requests::{NewProduct, ProductUpdate};
pub use responses::{ErrorResponse, HealthResponse};
