//! # Order Actor
//!
//! This module implements the Order collection and its status state machine.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`] type for type-safe error handling
//! - [`actions`] - [`OrderAction`] for cancel and the fulfillment transitions
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## State Machine
//!
//! ```text
//! PAYMENT_COMPLETED --Advance(Shipping)--> SHIPPING --Advance(Delivered)--> DELIVERED
//! PAYMENT_COMPLETED --Cancel (can_cancel)--> CANCELLED
//! ```
//!
//! The actor applies actions one at a time, so a cancel and the ship transition for the
//! same order can never interleave: whichever arrives first wins and the other is
//! rejected.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::{Order, OrderId};
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client. Ids are `order_1`, `order_2`, ...
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    let mut next = 0;
    ResourceActor::new(buffer_size, move || {
        next += 1;
        OrderId(next)
    })
}
