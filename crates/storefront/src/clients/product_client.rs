//! # Product Client
//!
//! Provides a high‑level API for interacting with the `Product` actor.
//! It wraps a `ResourceClient<Product>` and exposes domain‑specific methods.

use crate::catalog::{CatalogScope, ReviewStats};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use actor_framework::{ActorClient, FrameworkError, Listing, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            other => other
                .into_entity_error::<ProductError>()
                .unwrap_or_else(|e| ProductError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Administrative bulk insert. Stops at the first invalid product.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn seed_products(
        &self,
        products: Vec<ProductCreate>,
    ) -> Result<Vec<ProductId>, ProductError> {
        let mut ids = Vec::with_capacity(products.len());
        for params in products {
            ids.push(self.create_product(params).await?);
        }
        info!(count = ids.len(), "Catalog seeded");
        Ok(ids)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Fetches a product, failing with `NotFound` if it does not exist.
    pub async fn product(&self, id: ProductId) -> Result<Product, ProductError> {
        self.require(id).await
    }

    /// Snapshot of the whole catalog with its revision.
    pub async fn catalog(&self) -> Result<Listing<Product>, ProductError> {
        self.list().await
    }

    /// The products in `scope`, narrowed inside the product actor. The revision is the
    /// whole collection's, so caches must key on the scope as well.
    pub async fn catalog_in(&self, scope: &CatalogScope) -> Result<Listing<Product>, ProductError> {
        match scope {
            CatalogScope::All => self.list().await,
            CatalogScope::Category(_) => {
                let scope = scope.clone();
                self.find(move |product: &Product| scope.includes(product)).await
            }
        }
    }

    /// Check the current stock level for a product.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        debug!("Checking stock");
        match self
            .inner
            .perform_action(id, ProductAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(ProductError::ActorCommunicationError(format!(
                "unexpected result {other:?} for CheckStock"
            ))),
        }
    }

    /// Stores recomputed review stats. Returns `false` if newer stats were already stored.
    #[instrument(skip(self))]
    pub async fn apply_review_stats(
        &self,
        id: ProductId,
        stats: ReviewStats,
        revision: u64,
    ) -> Result<bool, ProductError> {
        match self
            .inner
            .perform_action(id, ProductAction::ApplyReviewStats { stats, revision })
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::ApplyReviewStats(applied) => Ok(applied),
            other => Err(ProductError::ActorCommunicationError(format!(
                "unexpected result {other:?} for ApplyReviewStats"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogView, FilterSpec};
    use actor_framework::mock::{create_mock_client, expect_action, MockClient};

    fn spawn_products() -> ProductClient {
        let (actor, inner) = crate::product_actor::new(8);
        tokio::spawn(actor.run(()));
        ProductClient::new(inner)
    }

    fn product(name: &str, category: &str, stock: u32) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            category: category.into(),
            price: 30.0,
            stock,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_check_stock_returns_correct_level() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let check_task = tokio::spawn(async move { product_client.check_stock(ProductId(1)).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, ProductId(1));
        assert!(matches!(action, ProductAction::CheckStock));
        responder
            .send(Ok(ProductActionResult::CheckStock(42)))
            .unwrap();

        assert_eq!(check_task.await.unwrap(), Ok(42));
    }

    #[tokio::test]
    async fn test_entity_errors_keep_their_type() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(
                ProductError::ValidationError("name is required".into()),
            )));
        mock.expect_action(ProductId(9))
            .return_err(FrameworkError::NotFound("product_9".into()));
        let client = ProductClient::new(mock.client());

        assert_eq!(
            client.create_product(ProductCreate::default()).await,
            Err(ProductError::ValidationError("name is required".into()))
        );
        assert_eq!(
            client.check_stock(ProductId(9)).await,
            Err(ProductError::NotFound("product_9".into()))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_actor_is_a_communication_error() {
        let (client, receiver) = create_mock_client::<Product>(1);
        drop(receiver);
        let result = ProductClient::new(client).product(ProductId(1)).await;
        assert!(matches!(
            result,
            Err(ProductError::ActorCommunicationError(_))
        ));
    }

    #[tokio::test]
    async fn test_stock_reads_keep_the_catalog_revision() {
        let client = spawn_products();
        let id = client.create_product(product("Lamp", "lighting", 4)).await.unwrap();

        let mut view = CatalogView::new();
        let all = CatalogScope::All;
        let spec = FilterSpec::default();
        let before = client.catalog().await.unwrap();
        view.products(&before, &all, &spec);

        assert_eq!(client.check_stock(id).await.unwrap(), 4);
        let after = client.catalog().await.unwrap();
        assert_eq!(after.revision, before.revision);
        assert!(view.is_cached(after.revision, &all, &spec));

        let updated = client
            .update_product(
                id,
                ProductUpdate {
                    stock: Some(9),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock, 9);

        let edited = client.catalog().await.unwrap();
        assert_eq!(edited.revision, before.revision + 1);
        assert!(!view.is_cached(edited.revision, &all, &spec));
        assert_eq!(view.products(&edited, &all, &spec)[0].stock, 9);
    }

    #[tokio::test]
    async fn test_update_of_missing_product_is_not_found() {
        let client = spawn_products();
        let result = client
            .update_product(ProductId(5), ProductUpdate::default())
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_category_scope_is_narrowed_by_the_actor() {
        let client = spawn_products();
        client
            .seed_products(vec![
                product("Lamp", "lighting", 1),
                product("Chair", "furniture", 1),
                product("Desk", "furniture", 1),
            ])
            .await
            .unwrap();

        let furniture = client
            .catalog_in(&CatalogScope::Category("furniture".into()))
            .await
            .unwrap();
        let names: Vec<&str> = furniture.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Chair", "Desk"]);

        let all = client.catalog_in(&CatalogScope::All).await.unwrap();
        assert_eq!(all.items.len(), 3);
        assert_eq!(all.revision, furniture.revision);
    }
}
