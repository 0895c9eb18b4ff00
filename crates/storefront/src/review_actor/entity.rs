//! Entity trait implementation for the Review domain type.

use super::error::ReviewError;
use crate::clients::OrderClient;
use crate::model::{Review, ReviewCreate, ReviewId, ReviewUpdate, MAX_REVIEW_PHOTOS};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

fn validate_rating(rating: u8) -> Result<(), ReviewError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ReviewError::ValidationError(format!(
            "rating must be between 1 and 5, got {rating}"
        )))
    }
}

fn validate_photos(photos: &[String]) -> Result<(), ReviewError> {
    if photos.len() > MAX_REVIEW_PHOTOS {
        return Err(ReviewError::ValidationError(format!(
            "at most {MAX_REVIEW_PHOTOS} photos, got {}",
            photos.len()
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Review {
    type Id = ReviewId;
    type Create = ReviewCreate;
    type Update = ReviewUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = OrderClient;
    type Error = ReviewError;

    fn from_create_params(id: ReviewId, params: ReviewCreate) -> Result<Self, Self::Error> {
        validate_rating(params.rating)?;
        validate_photos(&params.photos)?;
        Ok(Review::new(id, params))
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.user_id == other.user_id && self.product_id == other.product_id
    }

    /// Rejects reviews from users without a qualifying order.
    async fn on_create(&mut self, orders: &OrderClient) -> Result<(), Self::Error> {
        let purchased = orders.has_purchased(&self.user_id, self.product_id).await?;
        debug!(user_id = %self.user_id, product_id = %self.product_id, purchased, "Purchase check");
        if purchased {
            Ok(())
        } else {
            Err(ReviewError::NotPurchased(self.product_id))
        }
    }

    async fn on_update(&mut self, update: ReviewUpdate, _ctx: &OrderClient) -> Result<(), Self::Error> {
        if let Some(rating) = update.rating {
            validate_rating(rating)?;
        }
        if let Some(photos) = &update.photos {
            validate_photos(photos)?;
        }

        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(comment) = update.comment {
            self.comment = comment;
        }
        if let Some(photos) = update.photos {
            self.photos = photos;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &OrderClient) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductId, UserId};

    fn params(rating: u8, photos: usize) -> ReviewCreate {
        ReviewCreate {
            product_id: ProductId(1),
            user_id: UserId::from("u1"),
            user_name: "Alice".into(),
            user_photo: None,
            rating,
            comment: "ok".into(),
            photos: (0..photos).map(|i| format!("photo{i}.jpg")).collect(),
        }
    }

    #[test]
    fn validates_rating_and_photo_count() {
        assert!(Review::from_create_params(ReviewId(1), params(5, 3)).is_ok());
        assert!(matches!(
            Review::from_create_params(ReviewId(1), params(0, 0)),
            Err(ReviewError::ValidationError(_))
        ));
        assert!(Review::from_create_params(ReviewId(1), params(6, 0)).is_err());
        assert!(Review::from_create_params(ReviewId(1), params(4, 4)).is_err());
    }

    #[test]
    fn same_author_and_product_conflict() {
        let a = Review::from_create_params(ReviewId(1), params(5, 0)).unwrap();
        let b = Review::from_create_params(ReviewId(2), params(1, 0)).unwrap();
        assert!(a.conflicts_with(&b));

        let mut other_product = params(5, 0);
        other_product.product_id = ProductId(2);
        let c = Review::from_create_params(ReviewId(3), other_product).unwrap();
        assert!(!a.conflicts_with(&c));
    }
}
