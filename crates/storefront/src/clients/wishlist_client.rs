//! # Wishlist Client

use crate::clients::ProductClient;
use crate::model::{ProductId, UserId, Wishlist, WishlistLine};
use crate::wishlist_actor::{WishlistAction, WishlistError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct WishlistClient {
    inner: ResourceClient<Wishlist>,
    products: ProductClient,
}

impl WishlistClient {
    pub fn new(inner: ResourceClient<Wishlist>, products: ProductClient) -> Self {
        Self { inner, products }
    }

    /// The user's wishlist, created empty if it does not exist yet.
    #[instrument(skip(self))]
    pub async fn fetch_wishlist(&self, user_id: &UserId) -> Result<Wishlist, WishlistError> {
        if let Some(wishlist) = self.get(user_id.clone()).await? {
            return Ok(wishlist);
        }
        match self.inner.create_with_id(user_id.clone(), ()).await {
            Ok(_) | Err(FrameworkError::AlreadyExists(_)) => {}
            Err(e) => return Err(Self::map_error(e)),
        }
        self.require(user_id.clone()).await
    }

    /// Returns `false` if the product was already on the list.
    #[instrument(skip(self))]
    pub async fn add(&self, user_id: &UserId, product_id: ProductId) -> Result<bool, WishlistError> {
        self.apply(user_id, WishlistAction::Add(product_id)).await
    }

    /// Returns `false` if the product was not on the list.
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        user_id: &UserId,
        product_id: ProductId,
    ) -> Result<bool, WishlistError> {
        self.apply(user_id, WishlistAction::Remove(product_id)).await
    }

    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: &UserId) -> Result<bool, WishlistError> {
        self.apply(user_id, WishlistAction::Clear).await
    }

    /// Wishlist entries joined with their products; missing products are skipped.
    pub async fn wishlist_lines(&self, user_id: &UserId) -> Result<Vec<WishlistLine>, WishlistError> {
        let wishlist = self.fetch_wishlist(user_id).await?;
        let mut lines = Vec::with_capacity(wishlist.items.len());
        for item in wishlist.items {
            match self.products.get(item.product_id).await? {
                Some(product) => lines.push(WishlistLine {
                    product,
                    added_at: item.added_at,
                }),
                None => debug!(product_id = %item.product_id, "Skipping missing product"),
            }
        }
        Ok(lines)
    }

    async fn apply(&self, user_id: &UserId, action: WishlistAction) -> Result<bool, WishlistError> {
        self.fetch_wishlist(user_id).await?;
        self.inner
            .perform_action(user_id.clone(), action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Wishlist> for WishlistClient {
    type Error = WishlistError;

    fn inner(&self) -> &ResourceClient<Wishlist> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => WishlistError::NotFound(id),
            other => other
                .into_entity_error::<WishlistError>()
                .unwrap_or_else(|e| WishlistError::ActorCommunicationError(e.to_string())),
        }
    }
}
