//! # Review Actor
//!
//! The Review collection. It is the single authoritative point for both review rules:
//!
//! - **One review per (user, product)**: [`ActorEntity::conflicts_with`] is evaluated by
//!   the collection in the same message as the insert, so two concurrent submissions
//!   cannot both pass.
//! - **Purchase required**: `on_create` asks the Order collection (injected as context)
//!   whether the author has a non-cancelled order containing the product.
//!
//! Rating recomputation happens in [`ReviewClient`](crate::clients::ReviewClient) after
//! each write.
//!
//! [`ActorEntity::conflicts_with`]: actor_framework::ActorEntity::conflicts_with

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::{Review, ReviewId};
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Review actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Review>, ResourceClient<Review>) {
    let mut next = 0;
    ResourceActor::new(buffer_size, move || {
        next += 1;
        ReviewId(next)
    })
}
