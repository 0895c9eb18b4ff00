//! Entity trait implementation for the Order domain type.
//!
//! This module contains the [`ActorEntity`] trait implementation
//! that enables [`Order`] to be managed by the generic [`actor_framework::ResourceActor`].

use super::actions::OrderAction;
use super::error::OrderError;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = ();
    type Error = OrderError;

    /// Creates a new Order from creation parameters.
    ///
    /// # Validation
    /// - at least one line item, each with a positive quantity
    /// - non-empty shipping address and contact number
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError(
                "order must contain at least one item".into(),
            ));
        }
        if let Some(item) = params.items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "quantity for {} must be positive",
                item.product_id
            )));
        }
        if params.shipping_address.trim().is_empty() {
            return Err(OrderError::ValidationError(
                "shipping address is required".into(),
            ));
        }
        if params.contact_number.trim().is_empty() {
            return Err(OrderError::ValidationError(
                "contact number is required".into(),
            ));
        }
        Ok(Order::new(id, params))
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    /// Handles the order state machine.
    ///
    /// # Actions
    /// - `Cancel`: PAYMENT_COMPLETED with `can_cancel` -> CANCELLED, window closed
    /// - `Advance(Shipping)`: PAYMENT_COMPLETED -> SHIPPING, window closed
    /// - `Advance(Delivered)`: SHIPPING -> DELIVERED
    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &(),
    ) -> Result<Order, Self::Error> {
        match action {
            OrderAction::Cancel => {
                if !self.can_cancel || self.status != OrderStatus::PaymentCompleted {
                    return Err(OrderError::NotCancellable(self.id));
                }
                self.status = OrderStatus::Cancelled;
                self.can_cancel = false;
            }
            OrderAction::Advance(to) => {
                match (self.status, to) {
                    (OrderStatus::PaymentCompleted, OrderStatus::Shipping) => {
                        self.can_cancel = false;
                    }
                    (OrderStatus::Shipping, OrderStatus::Delivered) => {}
                    (from, to) => {
                        return Err(OrderError::InvalidTransition {
                            id: self.id,
                            from,
                            to,
                        })
                    }
                }
                self.status = to;
            }
        }
        self.updated_at = Utc::now();
        info!(order_id = %self.id, status = %self.status, "Order status changed");
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderItem, ProductId, UserId};

    fn params() -> OrderCreate {
        OrderCreate {
            user_id: UserId::from("u1"),
            items: vec![OrderItem {
                product_id: ProductId(1),
                product_name: "Desk".into(),
                product_image: None,
                quantity: 1,
                price: 50_000.0,
            }],
            total_amount: 50_000.0,
            shipping_address: "1 Main St, Apt 2".into(),
            contact_number: "010-0000-0000".into(),
        }
    }

    #[test]
    fn new_order_is_cancellable() {
        let order = Order::from_create_params(OrderId(1), params()).unwrap();
        assert_eq!(order.status, OrderStatus::PaymentCompleted);
        assert!(order.can_cancel);
    }

    #[test]
    fn rejects_empty_and_incomplete_orders() {
        let mut p = params();
        p.items.clear();
        assert!(matches!(
            Order::from_create_params(OrderId(1), p),
            Err(OrderError::ValidationError(_))
        ));

        let mut p = params();
        p.contact_number = "  ".into();
        assert!(matches!(
            Order::from_create_params(OrderId(1), p),
            Err(OrderError::ValidationError(_))
        ));

        let mut p = params();
        p.items[0].quantity = 0;
        assert!(Order::from_create_params(OrderId(1), p).is_err());
    }

    #[tokio::test]
    async fn cancel_closes_window_and_second_cancel_fails() {
        let mut order = Order::from_create_params(OrderId(1), params()).unwrap();

        let cancelled = order.handle_action(OrderAction::Cancel, &()).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(!cancelled.can_cancel);

        let again = order.handle_action(OrderAction::Cancel, &()).await;
        assert_eq!(again, Err(OrderError::NotCancellable(OrderId(1))));
    }

    #[tokio::test]
    async fn shipping_closes_cancel_window() {
        let mut order = Order::from_create_params(OrderId(1), params()).unwrap();

        order
            .handle_action(OrderAction::Advance(OrderStatus::Shipping), &())
            .await
            .unwrap();
        assert!(!order.can_cancel);
        assert!(order.handle_action(OrderAction::Cancel, &()).await.is_err());

        let delivered = order
            .handle_action(OrderAction::Advance(OrderStatus::Delivered), &())
            .await
            .unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn cancelled_order_never_ships() {
        let mut order = Order::from_create_params(OrderId(1), params()).unwrap();
        order.handle_action(OrderAction::Cancel, &()).await.unwrap();

        let err = order
            .handle_action(OrderAction::Advance(OrderStatus::Shipping), &())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                id: OrderId(1),
                from: OrderStatus::Cancelled,
                to: OrderStatus::Shipping,
            }
        );
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn cannot_skip_shipping() {
        let mut order = Order::from_create_params(OrderId(1), params()).unwrap();
        assert!(order
            .handle_action(OrderAction::Advance(OrderStatus::Delivered), &())
            .await
            .is_err());
        assert_eq!(order.status, OrderStatus::PaymentCompleted);
    }
}
