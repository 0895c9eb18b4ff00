//! # Catalog Pipeline
//!
//! Pure functions over in-memory records:
//!
//! - [`filter`]: the query/filter/sort pipeline behind the product listing
//! - [`view`]: memoised view of that pipeline
//! - [`pricing`]: rating aggregation and cart totals
//!
//! Nothing here talks to an actor; callers pass in snapshots.

pub mod filter;
pub mod pricing;
pub mod view;

pub use filter::*;
pub use pricing::*;
pub use view::*;
