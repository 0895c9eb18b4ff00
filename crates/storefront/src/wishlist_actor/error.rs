//! Error types for the Wishlist actor.

use crate::model::ProductId;
use crate::product_actor::ProductError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WishlistError {
    #[error("Wishlist not found: {0}")]
    NotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Product lookup failed: {0}")]
    Products(#[from] ProductError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
