//! # Storefront
//!
//! An e-commerce storefront built on the actor framework: every collection (products,
//! orders, reviews, carts, wishlists) is a `ResourceActor`, and a [`Session`](session::Session)
//! holds one shopper's view of them.
//!
//! - **[model]**: persisted records and their create/update payloads.
//! - **[catalog]**: the pure filter/sort pipeline, its memoised view, and derived
//!   aggregates (ratings, cart totals).
//! - **[fulfillment]**: timer-driven `PAYMENT_COMPLETED -> SHIPPING -> DELIVERED`
//!   transitions that can be cancelled or queried per order.
//! - **[clients]**: typed clients and the flows that span collections.
//! - **[session]**: the application state container with its actions and selectors.
//! - **[lifecycle]**: starts and stops the whole system.

pub mod cart_actor;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod fulfillment;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod product_actor;
pub mod review_actor;
pub mod session;
pub mod wishlist_actor;
