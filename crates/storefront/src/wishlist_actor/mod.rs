//! # Wishlist Actor
//!
//! The Wishlist collection, one document per user keyed by
//! [`UserId`](crate::model::UserId). Adding is idempotent: a product already on the list
//! keeps its original `added_at`.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Wishlist;
use actor_framework::{ResourceActor, ResourceClient};

pub fn new(buffer_size: usize) -> (ResourceActor<Wishlist>, ResourceClient<Wishlist>) {
    ResourceActor::keyed(buffer_size)
}
