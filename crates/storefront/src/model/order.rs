//! Represents a customer order.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
//!
//! Orders change only through [`OrderAction`](crate::order_actor::OrderAction)s:
//! the fulfillment transitions and the customer's cancel.

use crate::model::{ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Fulfillment stage of an order.
///
/// ```text
/// PAYMENT_COMPLETED --ship--> SHIPPING --deliver--> DELIVERED
/// PAYMENT_COMPLETED --cancel--> CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PaymentCompleted,
    Shipping,
    Delivered,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::PaymentCompleted => "PAYMENT_COMPLETED",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

/// One product line, priced when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: Option<String>,
    pub quantity: u32,
    /// Unit price paid, after discount.
    pub price: f64,
}

impl OrderItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    /// Fixed at creation, never recomputed.
    pub total_amount: f64,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub contact_number: String,
    /// True only while the order is PAYMENT_COMPLETED and has not been shipped or cancelled.
    pub can_cancel: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a freshly paid order.
    ///
    /// # Notes
    /// The order starts as `PaymentCompleted` with the cancellation window open.
    pub fn new(id: OrderId, params: OrderCreate) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: params.user_id,
            items: params.items,
            total_amount: params.total_amount,
            status: OrderStatus::PaymentCompleted,
            shipping_address: params.shipping_address,
            contact_number: params.contact_number,
            can_cancel: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn contains_product(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: String,
    pub contact_number: String,
}

/// Orders have no field updates; the type is uninhabited.
#[derive(Debug, Clone)]
pub enum OrderUpdate {}
