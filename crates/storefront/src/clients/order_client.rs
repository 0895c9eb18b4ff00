//! # Order Client
//!
//! Provides a high‑level API for interacting with the `Order` actor.
//! Placing an order also schedules its fulfillment; cancelling it stops the schedule.

use crate::fulfillment::FulfillmentHandle;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, ProductId, UserId};
use crate::order_actor::{OrderAction, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::cmp::Reverse;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    fulfillment: FulfillmentHandle,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, fulfillment: FulfillmentHandle) -> Self {
        Self { inner, fulfillment }
    }

    /// Stores a new order and starts its fulfillment timers.
    ///
    /// If the timers cannot be scheduled the order is deleted again, so no order is left
    /// that would never ship.
    #[instrument(skip(self, params), fields(user_id = %params.user_id))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!(items = params.items.len(), total = params.total_amount, "Sending request");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        if let Err(e) = self.fulfillment.schedule(id).await {
            warn!(order_id = %id, error = %e, "Fulfillment not scheduled, removing order");
            if let Err(cleanup) = self.inner.delete(id).await {
                warn!(order_id = %id, error = %cleanup, "Unscheduled order not removed");
            }
            return Err(Self::map_error(e));
        }
        info!(order_id = %id, "Order placed");
        self.order(id).await
    }

    /// Cancels an order whose cancellation window is still open.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, OrderError> {
        debug!("Sending request");
        let order = self
            .inner
            .perform_action(id, OrderAction::Cancel)
            .await
            .map_err(Self::map_error)?;
        if !self.fulfillment.cancel(id).await.map_err(Self::map_error)? {
            warn!(order_id = %id, "No pending fulfillment to stop");
        }
        Ok(order)
    }

    /// Fetches an order, failing with `NotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.require(id).await
    }

    /// Follows one order as the scheduler advances it. The receiver holds the current
    /// order and sees `None` once it is deleted.
    #[instrument(skip(self))]
    pub async fn watch_order(&self, id: OrderId) -> Result<watch::Receiver<Option<Order>>, OrderError> {
        self.inner.watch(id).await.map_err(Self::map_error)
    }

    /// All orders placed by `user_id`, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError> {
        let owner = user_id.clone();
        let mut orders = self
            .find(move |order: &Order| order.user_id == owner)
            .await?
            .items;
        orders.sort_by_key(|order| Reverse((order.created_at, order.id)));
        Ok(orders)
    }

    /// Whether `user_id` has a non-cancelled order containing `product_id`.
    #[instrument(skip(self))]
    pub async fn has_purchased(
        &self,
        user_id: &UserId,
        product_id: ProductId,
    ) -> Result<bool, OrderError> {
        let owner = user_id.clone();
        let listing = self
            .find(move |order: &Order| {
                order.user_id == owner
                    && order.status != OrderStatus::Cancelled
                    && order.contains_product(product_id)
            })
            .await?;
        Ok(!listing.items.is_empty())
    }

    /// Whether the order still has fulfillment transitions pending.
    pub async fn is_fulfillment_pending(&self, id: OrderId) -> Result<bool, OrderError> {
        self.fulfillment
            .is_pending(id)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}
