//! # Cart Actor
//!
//! The Cart collection, one document per user keyed by [`UserId`](crate::model::UserId).
//!
//! Carts change only through [`CartAction`]s applied inside the actor, so two sessions of
//! the same user editing the cart at once each see their change applied to the latest
//! cart instead of overwriting one another. Stock and product existence are checked
//! against the Product collection injected as context.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Cart;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Cart actor and its client. Carts are created under their owner's id.
pub fn new(buffer_size: usize) -> (ResourceActor<Cart>, ResourceClient<Cart>) {
    ResourceActor::keyed(buffer_size)
}
