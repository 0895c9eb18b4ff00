//! Error types for the Review actor.

use crate::model::ProductId;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(String),

    #[error("You have already reviewed {0}")]
    AlreadyReviewed(ProductId),

    #[error("Only customers who ordered {0} can review it")]
    NotPurchased(ProductId),

    #[error("Review validation error: {0}")]
    ValidationError(String),

    #[error("Purchase check failed: {0}")]
    Orders(#[from] OrderError),

    #[error("Rating update failed: {0}")]
    Products(#[from] ProductError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
