//! # Tracing Setup
//!
//! Every actor logs through `tracing` with structured fields (`entity_type`, `id`,
//! `revision`, ...). This module installs the subscriber that renders them.
//!
//! A typical `RUST_LOG=info` run of the storefront demo prints:
//!
//! ```text
//!  INFO Actor started entity_type="Product"
//!  INFO Applied entity_type="Product" op="create"
//!  INFO Applied entity_type="Order" op="create"
//!  INFO Fulfillment scheduled order_id=order_1
//!  INFO checkout:create_order: Order placed order_id=order_1 user_id=alice
//!  WARN Rejected entity_type="Order" op="action" error=Entity error: This order cannot be canceled: order_1
//! ```
//!
//! Use `debug` level to see the request payloads.

/// Initializes the tracing subscriber.
///
/// Filtering is controlled with the `RUST_LOG` environment variable, e.g.
/// `RUST_LOG=storefront=debug,actor_framework=info`.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type already says where a line comes from
        .compact()
        .try_init();
}
