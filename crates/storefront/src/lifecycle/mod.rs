//! # System Lifecycle
//!
//! Starts every collection actor plus the fulfillment scheduler, wires their contexts,
//! and shuts them down again.
//!
//! ## Dependency graph
//!
//! ```text
//! Cart ─────┐
//! Wishlist ─┼──> Product
//! Review ───┘
//! Review ──> OrderClient ──> Fulfillment ──> Order
//! ```
//!
//! Contexts are injected at `run(context)` time, so construction order does not matter.
//! The graph is acyclic, which means dropping the clients held by [`StoreSystem`] (and
//! by every [`Session`](crate::session::Session)) lets each actor stop once the actors
//! depending on it have stopped.

pub mod store_system;

pub use store_system::*;
