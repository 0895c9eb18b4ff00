//! Entity trait implementation for the Wishlist domain type.

use super::actions::WishlistAction;
use super::error::WishlistError;
use crate::clients::ProductClient;
use crate::model::{UserId, Wishlist, WishlistItem, WishlistUpdate};
use actor_framework::{ActorClient, ActorEntity};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Wishlist {
    type Id = UserId;
    type Create = ();
    type Update = WishlistUpdate;
    type Action = WishlistAction;
    type ActionResult = bool;
    type Context = ProductClient;
    type Error = WishlistError;

    fn from_create_params(id: UserId, _params: ()) -> Result<Self, Self::Error> {
        Ok(Wishlist::empty(id))
    }

    async fn on_update(
        &mut self,
        update: WishlistUpdate,
        _ctx: &ProductClient,
    ) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: WishlistAction,
        products: &ProductClient,
    ) -> Result<bool, Self::Error> {
        match action {
            WishlistAction::Add(product_id) => {
                if self.contains(product_id) {
                    return Ok(false);
                }
                if products.get(product_id).await?.is_none() {
                    return Err(WishlistError::ProductNotFound(product_id));
                }
                self.items.push(WishlistItem {
                    product_id,
                    added_at: Utc::now(),
                });
                Ok(true)
            }
            WishlistAction::Remove(product_id) => {
                let before = self.items.len();
                self.items.retain(|item| item.product_id != product_id);
                Ok(self.items.len() != before)
            }
            WishlistAction::Clear => {
                let changed = !self.items.is_empty();
                self.items.clear();
                Ok(changed)
            }
        }
    }

    /// Every action reports whether the list changed.
    fn changed_by(changed: &bool) -> bool {
        *changed
    }
}
