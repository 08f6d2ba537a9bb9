//! Request DTOs for the product API
//!
//! Defines the structure of incoming HTTP request bodies. The same types are
//! handed to the record store once validated.

use serde::Deserialize;

/// Maximum product name length in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum product description length in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Request body for creating a product (POST /products)
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i64,
}

impl NewProduct {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name)
            .or_else(|| validate_description(&self.description))
            .or_else(|| validate_price(self.price))
            .or_else(|| validate_stock(self.stock_quantity))
    }
}

/// Request body for a partial update (PUT /products/:id)
///
/// Absent and `null` fields are both left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

impl ProductUpdate {
    /// Returns true when the payload carries no field to change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock_quantity.is_none()
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.is_empty() {
            return Some("At least one field is required".to_string());
        }
        self.name
            .as_deref()
            .and_then(validate_name)
            .or_else(|| self.description.as_deref().and_then(validate_description))
            .or_else(|| self.price.and_then(validate_price))
            .or_else(|| self.stock_quantity.and_then(validate_stock))
    }
}

fn validate_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("Name cannot be empty".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Some(format!(
            "Name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        ));
    }
    None
}

fn validate_description(description: &str) -> Option<String> {
    if description.is_empty() {
        return Some("Description cannot be empty".to_string());
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Some(format!(
            "Description exceeds maximum length of {} characters",
            MAX_DESCRIPTION_LENGTH
        ));
    }
    None
}

fn validate_price(price: f64) -> Option<String> {
    if !price.is_finite() || price < 0.0 {
        return Some("Price must be a non-negative number".to_string());
    }
    None
}

fn validate_stock(stock_quantity: i64) -> Option<String> {
    if stock_quantity < 0 {
        return Some("Stock quantity must be non-negative".to_string());
    }
    None
}
