//! Entity trait implementation for the Product domain type.
//!
//! This module contains the [`ActorEntity`] trait implementation
//! that enables [`Product`] to be managed by the generic [`actor_framework::ResourceActor`].

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

fn validate_price(price: f64) -> Result<(), ProductError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ProductError::ValidationError(format!("invalid price {price}")))
    }
}

fn validate_discount(discount: Option<f64>) -> Result<(), ProductError> {
    match discount {
        Some(d) if !(0.0..=100.0).contains(&d) => Err(ProductError::ValidationError(format!(
            "discount must be between 0 and 100, got {d}"
        ))),
        _ => Ok(()),
    }
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = ProductError;

    /// Creates a new Product from creation parameters.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(ProductError::ValidationError("name is required".into()));
        }
        validate_price(params.price)?;
        validate_discount(params.discount_percentage)?;
        Ok(Product::new(id, params))
    }

    /// Handles updates to the Product entity.
    ///
    /// Rating and review count are not updatable here; they follow the reviews.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(price) = update.price {
            validate_price(price)?;
        }
        validate_discount(update.discount_percentage)?;

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(discount) = update.discount_percentage {
            self.discount_percentage = Some(discount);
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, Self::Error> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ApplyReviewStats { stats, revision } => {
                if revision < self.review_revision {
                    debug!(
                        product_id = %self.id,
                        revision,
                        current = self.review_revision,
                        "Ignoring stale review stats"
                    );
                    return Ok(ProductActionResult::ApplyReviewStats(false));
                }
                self.rating = stats.rating;
                self.num_reviews = stats.count;
                self.review_revision = revision;
                self.updated_at = Utc::now();
                Ok(ProductActionResult::ApplyReviewStats(true))
            }
        }
    }

    fn changed_by(result: &ProductActionResult) -> bool {
        matches!(result, ProductActionResult::ApplyReviewStats(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ReviewStats;

    fn lamp() -> Product {
        Product::from_create_params(
            ProductId(1),
            ProductCreate {
                name: "Lamp".into(),
                price: 30.0,
                stock: 4,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn rejects_bad_prices_and_discounts() {
        let bad_price = ProductCreate {
            name: "x".into(),
            price: -1.0,
            ..Default::default()
        };
        assert!(Product::from_create_params(ProductId(1), bad_price).is_err());

        let bad_discount = ProductCreate {
            name: "x".into(),
            price: 1.0,
            discount_percentage: Some(120.0),
            ..Default::default()
        };
        assert!(Product::from_create_params(ProductId(1), bad_discount).is_err());
    }

    #[tokio::test]
    async fn stale_review_stats_are_ignored() {
        let mut product = lamp();

        let newer = ProductAction::ApplyReviewStats {
            stats: ReviewStats::from_ratings([4, 2]),
            revision: 6,
        };
        assert_eq!(
            product.handle_action(newer, &()).await.unwrap(),
            ProductActionResult::ApplyReviewStats(true)
        );

        let older = ProductAction::ApplyReviewStats {
            stats: ReviewStats::from_ratings([4]),
            revision: 5,
        };
        assert_eq!(
            product.handle_action(older, &()).await.unwrap(),
            ProductActionResult::ApplyReviewStats(false)
        );
        assert_eq!(product.rating, 3.0);
        assert_eq!(product.num_reviews, 2);
    }

    #[tokio::test]
    async fn update_leaves_unset_fields() {
        let mut product = lamp();
        product
            .on_update(
                ProductUpdate {
                    stock: Some(9),
                    ..Default::default()
                },
                &(),
            )
            .await
            .unwrap();
        assert_eq!(product.stock, 9);
        assert_eq!(product.price, 30.0);
    }
}
