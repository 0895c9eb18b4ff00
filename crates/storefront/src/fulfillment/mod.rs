//! # Fulfillment Scheduler
//!
//! Moves each placed order through `PAYMENT_COMPLETED -> SHIPPING -> DELIVERED` on a
//! timer, standing in for a real logistics integration.
//!
//! Every order gets one tokio task that sleeps, then asks the Order actor to apply
//! `Advance(Shipping)`, sleeps again, then `Advance(Delivered)`. The scheduler is itself
//! an actor that owns those tasks, so a pending fulfillment can be queried or cancelled
//! by order id.
//!
//! ## Cancel vs. ship
//!
//! Cancelling aborts the task. If the ship timer already fired, the Order actor
//! serialises the two actions: whichever it processes first wins and the other fails
//! (`NotCancellable` for the cancel, `InvalidTransition` for the ship). A cancelled order
//! therefore never ships.
//!
//! ## Shutdown
//!
//! The scheduler stops when every [`FulfillmentHandle`] is dropped. Pending tasks are
//! aborted at that point, which also releases their Order clients.

use crate::model::{Order, OrderId, OrderStatus};
use crate::order_actor::OrderAction;
use actor_framework::{FrameworkError, ResourceClient};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Delay before shipping (measured from order creation) and before delivery (measured
/// from shipping).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FulfillmentDelays {
    pub ship: Duration,
    pub deliver: Duration,
}

impl Default for FulfillmentDelays {
    fn default() -> Self {
        Self {
            ship: Duration::from_millis(5000),
            deliver: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug)]
pub enum FulfillmentRequest {
    Schedule {
        order_id: OrderId,
        respond_to: oneshot::Sender<()>,
    },
    Cancel {
        order_id: OrderId,
        respond_to: oneshot::Sender<bool>,
    },
    IsPending {
        order_id: OrderId,
        respond_to: oneshot::Sender<bool>,
    },
}

/// Actor owning one fulfillment task per order.
pub struct FulfillmentScheduler {
    receiver: mpsc::Receiver<FulfillmentRequest>,
    delays: FulfillmentDelays,
    tasks: HashMap<OrderId, JoinHandle<()>>,
}

impl FulfillmentScheduler {
    pub fn new(buffer_size: usize, delays: FulfillmentDelays) -> (Self, FulfillmentHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let scheduler = Self {
            receiver,
            delays,
            tasks: HashMap::new(),
        };
        (scheduler, FulfillmentHandle { sender })
    }

    /// Runs until every handle is dropped. `orders` is the collection the transitions
    /// are applied to.
    pub async fn run(mut self, orders: ResourceClient<Order>) {
        info!(
            ship_ms = self.delays.ship.as_millis() as u64,
            deliver_ms = self.delays.deliver.as_millis() as u64,
            "Fulfillment scheduler started"
        );

        while let Some(msg) = self.receiver.recv().await {
            self.tasks.retain(|_, task| !task.is_finished());
            match msg {
                FulfillmentRequest::Schedule {
                    order_id,
                    respond_to,
                } => {
                    let task = tokio::spawn(fulfil(order_id, orders.clone(), self.delays));
                    if let Some(previous) = self.tasks.insert(order_id, task) {
                        warn!(%order_id, "Replacing existing fulfillment task");
                        previous.abort();
                    }
                    info!(%order_id, "Fulfillment scheduled");
                    let _ = respond_to.send(());
                }
                FulfillmentRequest::Cancel {
                    order_id,
                    respond_to,
                } => {
                    let cancelled = match self.tasks.remove(&order_id) {
                        Some(task) => {
                            task.abort();
                            true
                        }
                        None => false,
                    };
                    info!(%order_id, cancelled, "Fulfillment cancel");
                    let _ = respond_to.send(cancelled);
                }
                FulfillmentRequest::IsPending {
                    order_id,
                    respond_to,
                } => {
                    let pending = self.tasks.contains_key(&order_id);
                    debug!(%order_id, pending, "IsPending");
                    let _ = respond_to.send(pending);
                }
            }
        }

        for (order_id, task) in self.tasks.drain() {
            debug!(%order_id, "Aborting fulfillment on shutdown");
            task.abort();
        }
        info!("Fulfillment scheduler shutdown");
    }
}

async fn fulfil(order_id: OrderId, orders: ResourceClient<Order>, delays: FulfillmentDelays) {
    tokio::time::sleep(delays.ship).await;
    if let Err(e) = orders
        .perform_action(order_id, OrderAction::Advance(OrderStatus::Shipping))
        .await
    {
        // Cancelled (or removed) before the timer fired.
        warn!(%order_id, error = %e, "Ship transition rejected");
        return;
    }

    tokio::time::sleep(delays.deliver).await;
    if let Err(e) = orders
        .perform_action(order_id, OrderAction::Advance(OrderStatus::Delivered))
        .await
    {
        warn!(%order_id, error = %e, "Deliver transition rejected");
        return;
    }
    info!(%order_id, "Order delivered");
}

/// Client side of the [`FulfillmentScheduler`].
#[derive(Clone)]
pub struct FulfillmentHandle {
    sender: mpsc::Sender<FulfillmentRequest>,
}

impl FulfillmentHandle {
    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> FulfillmentRequest,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    /// Starts the ship/deliver timers for `order_id`.
    pub async fn schedule(&self, order_id: OrderId) -> Result<(), FrameworkError> {
        self.request(|respond_to| FulfillmentRequest::Schedule {
            order_id,
            respond_to,
        })
        .await
    }

    /// Stops pending transitions. Returns whether a task was still registered.
    pub async fn cancel(&self, order_id: OrderId) -> Result<bool, FrameworkError> {
        self.request(|respond_to| FulfillmentRequest::Cancel {
            order_id,
            respond_to,
        })
        .await
    }

    /// Whether a fulfillment task for `order_id` has not yet finished.
    pub async fn is_pending(&self, order_id: OrderId) -> Result<bool, FrameworkError> {
        self.request(|respond_to| FulfillmentRequest::IsPending {
            order_id,
            respond_to,
        })
        .await
    }
}
