//! # Domain Model
//!
//! Typed records for every collection the storefront persists. Each record serializes
//! with camelCase field names and epoch-millisecond timestamps, matching the documents
//! kept by the hosted store. Timestamps are converted exactly once, by serde, at that
//! boundary; everything inside the crate works with `chrono::DateTime<Utc>`.

pub mod cart;
pub mod order;
pub mod product;
pub mod review;
pub mod user;
pub mod wishlist;

pub use cart::*;
pub use order::*;
pub use product::*;
pub use review::*;
pub use user::*;
pub use wishlist::*;
