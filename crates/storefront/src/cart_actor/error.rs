//! Error types for the Cart actor.

use crate::model::ProductId;
use crate::product_actor::ProductError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),

    #[error("Item not found in cart: {0}")]
    ItemNotFound(ProductId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Quantity must be positive")]
    InvalidQuantity,

    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Product lookup failed: {0}")]
    Products(#[from] ProductError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
