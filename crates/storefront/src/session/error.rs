use crate::cart_actor::CartError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::review_actor::ReviewError;
use crate::wishlist_actor::WishlistError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("Sign in required")]
    SignInRequired,

    /// Rejected before any store call.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Orders(#[from] OrderError),

    #[error(transparent)]
    Products(#[from] ProductError),

    #[error(transparent)]
    Reviews(#[from] ReviewError),

    #[error(transparent)]
    Wishlist(#[from] WishlistError),
}
