//! # Product Actor
//!
//! The catalog. Products are created by seeding, edited by administrators, and read by
//! every shopper. Two actions sit on top of plain CRUD: a stock lookup used by carts, and
//! [`ProductAction::ApplyReviewStats`], through which the review collection keeps each
//! product's rating current.
//!
//! ## Usage
//!
//! ```rust
//! use storefront::clients::ProductClient;
//! use storefront::model::ProductCreate;
//! use storefront::product_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = product_actor::new(32);
//!     let client = ProductClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let params = ProductCreate {
//!         name: "Widget".to_string(),
//!         price: 29.99,
//!         stock: 100,
//!         ..Default::default()
//!     };
//!     let id = client.create_product(params).await?;
//!     assert_eq!(client.check_stock(id).await?, 100);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::{Product, ProductId};
use actor_framework::{ResourceActor, ResourceClient};

/// The catalog actor, numbering products from 1.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ResourceClient<Product>) {
    let mut next = 0;
    ResourceActor::new(buffer_size, move || {
        next += 1;
        ProductId(next)
    })
}
