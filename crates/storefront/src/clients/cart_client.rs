//! # Cart Client
//!
//! Per-user cart operations. A user's cart document is created on first use.

use crate::cart_actor::{CartAction, CartError};
use crate::clients::ProductClient;
use crate::model::{Cart, CartLine, ProductId, UserId};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
    products: ProductClient,
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>, products: ProductClient) -> Self {
        Self { inner, products }
    }

    /// The user's cart, created empty if it does not exist yet.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self, user_id: &UserId) -> Result<Cart, CartError> {
        if let Some(cart) = self.get(user_id.clone()).await? {
            return Ok(cart);
        }
        match self.inner.create_with_id(user_id.clone(), ()).await {
            // Another session created it first.
            Ok(_) | Err(FrameworkError::AlreadyExists(_)) => {}
            Err(e) => return Err(Self::map_error(e)),
        }
        debug!("Cart created");
        self.require(user_id.clone()).await
    }

    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        user_id: &UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        self.apply(
            user_id,
            CartAction::AddItem {
                product_id,
                quantity,
            },
        )
        .await
    }

    /// Sets a line's quantity; zero or less removes the line.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        user_id: &UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, CartError> {
        self.apply(
            user_id,
            CartAction::SetQuantity {
                product_id,
                quantity,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: &UserId,
        product_id: ProductId,
    ) -> Result<Cart, CartError> {
        self.apply(user_id, CartAction::RemoveItem(product_id)).await
    }

    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: &UserId) -> Result<Cart, CartError> {
        self.apply(user_id, CartAction::Clear).await
    }

    /// Cart items joined with their current product records, in cart order.
    ///
    /// Items whose product no longer exists are skipped.
    #[instrument(skip(self))]
    pub async fn cart_lines(&self, user_id: &UserId) -> Result<Vec<CartLine>, CartError> {
        let cart = self.fetch_cart(user_id).await?;
        let mut lines = Vec::with_capacity(cart.items.len());
        for item in cart.items {
            match self.products.get(item.product_id).await? {
                Some(product) => lines.push(CartLine {
                    product,
                    quantity: item.quantity,
                }),
                None => debug!(product_id = %item.product_id, "Skipping missing product"),
            }
        }
        Ok(lines)
    }

    async fn apply(&self, user_id: &UserId, action: CartAction) -> Result<Cart, CartError> {
        self.fetch_cart(user_id).await?;
        self.inner
            .perform_action(user_id.clone(), action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<Cart> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CartError::NotFound(id),
            other => other
                .into_entity_error::<CartError>()
                .unwrap_or_else(|e| CartError::ActorCommunicationError(e.to_string())),
        }
    }
}
