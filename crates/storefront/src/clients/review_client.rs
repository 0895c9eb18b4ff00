//! # Review Client
//!
//! Wraps the Review collection and keeps each product's `rating` / `num_reviews` in step
//! with it. Every add, edit or delete is followed by a recompute from the reviews that
//! remain, tagged with the review collection's revision so that an older recompute can
//! never overwrite a newer one.

use crate::catalog::ReviewStats;
use crate::clients::ProductClient;
use crate::model::{ProductId, Review, ReviewCreate, ReviewId, ReviewUpdate, UserId};
use crate::review_actor::ReviewError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::cmp::Reverse;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct ReviewClient {
    inner: ResourceClient<Review>,
    products: ProductClient,
}

impl ReviewClient {
    pub fn new(inner: ResourceClient<Review>, products: ProductClient) -> Self {
        Self { inner, products }
    }

    /// Stores a review and refreshes the product's rating.
    ///
    /// # Errors
    /// - `ValidationError`: rating outside 1..=5 or more than three photos
    /// - `AlreadyReviewed`: the author already reviewed this product
    /// - `NotPurchased`: the author has no qualifying order
    #[instrument(skip(self, params), fields(user_id = %params.user_id, product_id = %params.product_id))]
    pub async fn add_review(&self, params: ReviewCreate) -> Result<Review, ReviewError> {
        let product_id = params.product_id;
        let id = self.inner.create(params).await.map_err(|e| match e {
            FrameworkError::Conflict(_) => ReviewError::AlreadyReviewed(product_id),
            other => Self::map_error(other),
        })?;
        self.refresh_product_rating(product_id).await?;
        info!(review_id = %id, "Review added");
        self.review(id).await
    }

    #[instrument(skip(self))]
    pub async fn update_review(
        &self,
        id: ReviewId,
        update: ReviewUpdate,
    ) -> Result<Review, ReviewError> {
        let review = self.inner.update(id, update).await.map_err(Self::map_error)?;
        self.refresh_product_rating(review.product_id).await?;
        Ok(review)
    }

    #[instrument(skip(self))]
    pub async fn delete_review(&self, id: ReviewId) -> Result<(), ReviewError> {
        let review = self.review(id).await?;
        self.delete(id).await?;
        self.refresh_product_rating(review.product_id).await?;
        info!(review_id = %id, "Review deleted");
        Ok(())
    }

    /// Fetches a review, failing with `NotFound` if it does not exist.
    pub async fn review(&self, id: ReviewId) -> Result<Review, ReviewError> {
        self.require(id).await
    }

    /// Recomputes `rating` and `num_reviews` for `product_id` from the stored reviews.
    ///
    /// Returns the stats; they are not stored if a newer recompute got there first.
    #[instrument(skip(self))]
    pub async fn refresh_product_rating(
        &self,
        product_id: ProductId,
    ) -> Result<ReviewStats, ReviewError> {
        let listing = self
            .find(move |review: &Review| review.product_id == product_id)
            .await?;
        let stats = ReviewStats::from_ratings(listing.items.iter().map(|r| r.rating));
        let applied = self
            .products
            .apply_review_stats(product_id, stats, listing.revision)
            .await?;
        debug!(
            rating = stats.rating,
            count = stats.count,
            revision = listing.revision,
            applied,
            "Product rating refreshed"
        );
        Ok(stats)
    }

    /// Reviews of one product, newest first.
    pub async fn reviews_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, ReviewError> {
        self.newest_first(move |review: &Review| review.product_id == product_id)
            .await
    }

    /// Reviews written by one user, newest first.
    pub async fn reviews_by_user(&self, user_id: &UserId) -> Result<Vec<Review>, ReviewError> {
        let author = user_id.clone();
        self.newest_first(move |review: &Review| review.user_id == author)
            .await
    }

    async fn newest_first(
        &self,
        predicate: impl Fn(&Review) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<Review>, ReviewError> {
        let mut reviews = self.find(predicate).await?.items;
        reviews.sort_by_key(|review| Reverse((review.created_at, review.id)));
        Ok(reviews)
    }
}

#[async_trait]
impl ActorClient<Review> for ReviewClient {
    type Error = ReviewError;

    fn inner(&self) -> &ResourceClient<Review> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => ReviewError::NotFound(id),
            other => other
                .into_entity_error::<ReviewError>()
                .unwrap_or_else(|e| ReviewError::ActorCommunicationError(e.to_string())),
        }
    }
}
