//! Custom actions for the Order actor.

use crate::model::OrderStatus;

/// Status changes an order accepts. Every action returns the updated order.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Customer cancellation; allowed only while `can_cancel` is set.
    Cancel,
    /// Fulfillment transition to `Shipping` or `Delivered`.
    Advance(OrderStatus),
}
