//! # Actor Framework
//!
//! Typed collections served by Tokio tasks. Each record type gets one actor that owns
//! every record of that type and answers create, read, update, delete, action and list
//! requests sent through a cloneable client.
//!
//! ## Collections as Actors
//!
//! Each `ResourceActor<T>` behaves like one collection of a document store:
//!
//! - Standard CRUD operations plus filtered listing
//! - Caller-chosen ids (`create_with_id`) for records keyed by their owner, such as carts
//! - A per-collection `revision` counter returned with every listing
//! - Uniqueness rules checked atomically with the insert (`ActorEntity::conflicts_with`)
//!
//! Each actor processes its messages sequentially, so two writes to the same collection
//! never interleave. Collections that need each other (a review checking the buyer's
//! orders) talk through **clients** injected at start-up.
//!
//! Background on the pattern: [Actors with Tokio](https://ryhl.io/blog/actors-with-tokio/).
//!
//! ## Pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`ActorEntity`] | the record and its hooks: validation, updates, actions |
//! | [`ResourceActor`] | the task owning one collection |
//! | [`ResourceClient`] | cloneable handle sending requests to that task |
//! | [`ActorClient`] | trait for domain wrappers around a `ResourceClient` |
//! | [`mock::MockClient`] | a `ResourceClient` answered from canned replies |
//!
//! ## A Minimal Collection
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Shelf {
//!     label: String,
//!     capacity: u32,
//! }
//!
//! #[derive(Debug)] struct ShelfCreate { label: String, capacity: u32 }
//! #[derive(Debug)] struct Resize(u32);
//! #[derive(Debug)] enum ShelfAction {}
//! #[derive(Debug, thiserror::Error)] #[error("capacity must be positive")] struct ZeroCapacity;
//!
//! #[async_trait]
//! impl ActorEntity for Shelf {
//!     type Id = u64;
//!     type Create = ShelfCreate;
//!     type Update = Resize;
//!     type Action = ShelfAction;
//!     type ActionResult = ();
//!     type Context = ();
//!     type Error = ZeroCapacity;
//!
//!     fn from_create_params(_id: u64, params: ShelfCreate) -> Result<Self, ZeroCapacity> {
//!         if params.capacity == 0 {
//!             return Err(ZeroCapacity);
//!         }
//!         Ok(Self { label: params.label, capacity: params.capacity })
//!     }
//!
//!     async fn on_update(&mut self, update: Resize, _: &()) -> Result<(), ZeroCapacity> {
//!         let Resize(capacity) = update;
//!         if capacity == 0 {
//!             return Err(ZeroCapacity);
//!         }
//!         self.capacity = capacity;
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: ShelfAction, _: &()) -> Result<(), ZeroCapacity> {
//!         match action {}
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut next = 100;
//!     let (actor, shelves) = ResourceActor::<Shelf>::new(10, move || { next += 1; next });
//!     tokio::spawn(actor.run(()));
//!
//!     let id = shelves.create(ShelfCreate { label: "A1".into(), capacity: 4 }).await.unwrap();
//!     assert_eq!(id, 101);
//!     assert!(shelves.update(id, Resize(0)).await.is_err());
//!     assert_eq!(shelves.update(id, Resize(8)).await.unwrap().capacity, 8);
//!
//!     // Two writes succeeded
//!     let listing = shelves.list().await.unwrap();
//!     assert_eq!((listing.items.len(), listing.revision), (1, 2));
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! A collection that needs another one receives that collection's client as its
//! `Context` when it is started, not when it is constructed. Every actor can therefore
//! be created first and wired afterwards. Below, reservations check a keyed stock
//! collection before they are stored:
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//!
//! #[derive(Debug, thiserror::Error)]
//! enum ShopError {
//!     #[error("unknown sku {0}")]
//!     UnknownSku(String),
//!     #[error("{0}")]
//!     Lookup(String),
//! }
//!
//! #[derive(Clone, Debug)]
//! struct Stock { sku: String, units: u32 }
//! #[derive(Debug)] enum NoUpdate {}
//! #[derive(Debug)] enum NoAction {}
//!
//! #[async_trait]
//! impl ActorEntity for Stock {
//!     type Id = String; type Create = u32; type Update = NoUpdate; type Action = NoAction;
//!     type ActionResult = (); type Context = (); type Error = ShopError;
//!     fn from_create_params(sku: String, units: u32) -> Result<Self, Self::Error> {
//!         Ok(Self { sku, units })
//!     }
//!     async fn on_update(&mut self, update: NoUpdate, _: &()) -> Result<(), Self::Error> { match update {} }
//!     async fn handle_action(&mut self, action: NoAction, _: &()) -> Result<(), Self::Error> { match action {} }
//! }
//!
//! #[derive(Clone, Debug)]
//! struct Reservation { id: u32, sku: String }
//!
//! #[async_trait]
//! impl ActorEntity for Reservation {
//!     type Id = u32; type Create = String; type Update = NoUpdate; type Action = NoAction;
//!     type ActionResult = ();
//!     // The stock collection, injected by `run`
//!     type Context = ResourceClient<Stock>;
//!     type Error = ShopError;
//!
//!     fn from_create_params(id: u32, sku: String) -> Result<Self, Self::Error> {
//!         Ok(Self { id, sku })
//!     }
//!
//!     async fn on_create(&mut self, stock: &ResourceClient<Stock>) -> Result<(), Self::Error> {
//!         match stock.get(self.sku.clone()).await {
//!             Ok(Some(_)) => Ok(()),
//!             Ok(None) => Err(ShopError::UnknownSku(self.sku.clone())),
//!             Err(e) => Err(ShopError::Lookup(e.to_string())),
//!         }
//!     }
//!
//!     async fn on_update(&mut self, update: NoUpdate, _: &Self::Context) -> Result<(), Self::Error> { match update {} }
//!     async fn handle_action(&mut self, action: NoAction, _: &Self::Context) -> Result<(), Self::Error> { match action {} }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Create both collections
//!     let (stock_actor, stock) = ResourceActor::<Stock>::keyed(10);
//!     let mut next = 0;
//!     let (reservation_actor, reservations) =
//!         ResourceActor::<Reservation>::new(10, move || { next += 1; next });
//!
//!     // 2. Wire dependencies when starting them
//!     tokio::spawn(stock_actor.run(()));
//!     tokio::spawn(reservation_actor.run(stock.clone()));
//!
//!     stock.create_with_id("sku-1".to_string(), 3).await.unwrap();
//!     assert!(reservations.create("sku-1".to_string()).await.is_ok());
//!     assert!(reservations.create("sku-9".to_string()).await.is_err());
//! }
//! ```
//!
//! The graph of injected clients must stay acyclic: a collection stops once every client
//! for it is dropped, including the ones held as other collections' contexts.
//!
//! ## Testing
//!
//! Collections whose hooks call other collections are tested against a
//! [`mock::MockClient`] standing in for the dependency. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod telemetry;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, Listing, ResourceRequest, Response};
