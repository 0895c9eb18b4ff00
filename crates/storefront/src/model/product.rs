//! Represents a product in the catalog.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
//!
//! See [`impl ActorEntity for Product`](#impl-ActorEntity-for-Product) for details on:
//! - Creation parameters ([`ProductCreate`](crate::model::ProductCreate))
//! - Update parameters ([`ProductUpdate`](crate::model::ProductUpdate))
//! - Custom actions ([`ProductAction`](crate::product_actor::ProductAction))

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Percentage off `price`, 0 to 100.
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    pub images: Vec<String>,
    pub category: String,
    pub stock: u32,
    /// Mean of all review ratings, 0 when there are none.
    pub rating: f64,
    pub num_reviews: u32,
    /// Review-collection revision the rating was computed from.
    #[serde(default)]
    pub review_revision: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a product with no reviews, stamped with the current time.
    pub fn new(id: ProductId, params: ProductCreate) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            discount_percentage: params.discount_percentage,
            images: params.images,
            category: params.category,
            stock: params.stock,
            rating: 0.0,
            num_reviews: 0,
            review_revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Unit price after the discount, the price charged at checkout.
    pub fn effective_price(&self) -> f64 {
        match self.discount_percentage {
            Some(discount) if discount > 0.0 => self.price * (1.0 - discount / 100.0),
            _ => self.price,
        }
    }

    /// First image, used as the thumbnail on order lines.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub discount_percentage: Option<f64>,
    pub images: Vec<String>,
    pub category: String,
    pub stock: u32,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub stock: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64, discount: Option<f64>) -> Product {
        Product::new(
            ProductId(1),
            ProductCreate {
                name: "Lamp".into(),
                price,
                discount_percentage: discount,
                ..Default::default()
            },
        )
    }

    #[test]
    fn effective_price_applies_discount() {
        assert_eq!(product(200.0, Some(25.0)).effective_price(), 150.0);
        assert_eq!(product(200.0, None).effective_price(), 200.0);
        assert_eq!(product(200.0, Some(0.0)).effective_price(), 200.0);
    }

    #[test]
    fn timestamps_serialize_as_epoch_millis() {
        let mut p = product(10.0, None);
        p.created_at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        p.updated_at = p.created_at;

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["createdAt"], 1_700_000_000_123_i64);
        assert_eq!(json["id"], 1);
        assert!(json.get("numReviews").is_some());

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back.created_at, p.created_at);
    }
}
