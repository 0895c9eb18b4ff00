//! # Resource Clients
//!
//! Type-safe wrappers around each collection's `ResourceClient`. They hide message
//! passing, translate `FrameworkError` into the collection's own error type, and hold
//! the multi-step flows that span collections (order placement plus scheduling, review
//! writes plus rating recompute).

pub mod cart_client;
pub mod order_client;
pub mod product_client;
pub mod review_client;
pub mod wishlist_client;

pub use cart_client::CartClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use review_client::ReviewClient;
pub use wishlist_client::WishlistClient;

/// One client per collection, handed to every [`Session`](crate::session::Session).
#[derive(Clone)]
pub struct StoreClients {
    pub products: ProductClient,
    pub carts: CartClient,
    pub wishlists: WishlistClient,
    pub orders: OrderClient,
    pub reviews: ReviewClient,
}
