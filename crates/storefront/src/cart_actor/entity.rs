//! Entity trait implementation for the Cart domain type.

use super::actions::CartAction;
use super::error::CartError;
use crate::clients::ProductClient;
use crate::model::{Cart, CartItem, CartUpdate, ProductId, UserId};
use actor_framework::{ActorClient, ActorEntity};
use async_trait::async_trait;
use chrono::Utc;

/// Fails unless `requested` units of `product_id` exist in stock.
async fn ensure_stock(
    products: &ProductClient,
    product_id: ProductId,
    requested: u32,
) -> Result<(), CartError> {
    let product = products
        .get(product_id)
        .await?
        .ok_or(CartError::ProductNotFound(product_id))?;
    if requested > product.stock {
        return Err(CartError::InsufficientStock {
            product_id,
            requested,
            available: product.stock,
        });
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Cart {
    type Id = UserId;
    type Create = ();
    type Update = CartUpdate;
    type Action = CartAction;
    type ActionResult = Cart;
    type Context = ProductClient;
    type Error = CartError;

    fn from_create_params(id: UserId, _params: ()) -> Result<Self, Self::Error> {
        Ok(Cart::empty(id))
    }

    async fn on_update(&mut self, update: CartUpdate, _ctx: &ProductClient) -> Result<(), Self::Error> {
        match update {}
    }

    /// # Actions
    /// - `AddItem`: merge into an existing line; the merged quantity must be in stock
    /// - `SetQuantity`: `<= 0` removes the line, otherwise replaces the quantity
    /// - `RemoveItem`: drop the line (no-op when absent)
    /// - `Clear`: empty the cart
    async fn handle_action(
        &mut self,
        action: CartAction,
        products: &ProductClient,
    ) -> Result<Cart, Self::Error> {
        match action {
            CartAction::AddItem {
                product_id,
                quantity,
            } => {
                if quantity == 0 {
                    return Err(CartError::InvalidQuantity);
                }
                let existing = self.item(product_id).map_or(0, |item| item.quantity);
                let merged = existing.saturating_add(quantity);
                ensure_stock(products, product_id, merged).await?;
                match self.items.iter_mut().find(|item| item.product_id == product_id) {
                    Some(item) => item.quantity = merged,
                    None => self.items.push(CartItem {
                        product_id,
                        quantity,
                    }),
                }
            }
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => {
                let index = self
                    .items
                    .iter()
                    .position(|item| item.product_id == product_id)
                    .ok_or(CartError::ItemNotFound(product_id))?;
                if quantity <= 0 {
                    self.items.remove(index);
                } else {
                    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                    ensure_stock(products, product_id, quantity).await?;
                    self.items[index].quantity = quantity;
                }
            }
            CartAction::RemoveItem(product_id) => {
                self.items.retain(|item| item.product_id != product_id);
            }
            CartAction::Clear => self.items.clear(),
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}
