//! Memoised catalog view.

use super::filter::{apply, FilterSpec};
use crate::model::Product;
use actor_framework::Listing;

/// Which part of the catalog a listing was fetched for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogScope {
    #[default]
    All,
    /// Narrowed by the product actor to one category before it is returned.
    Category(String),
}

impl CatalogScope {
    pub fn includes(&self, product: &Product) -> bool {
        match self {
            CatalogScope::All => true,
            CatalogScope::Category(category) => product.category == *category,
        }
    }
}

/// Caches the last [`apply`] result.
///
/// The cache key is the listing's revision, the scope it was fetched for, and the filter
/// spec. A full listing and a narrowed one share the collection revision, so the scope
/// has to be part of the key; with it, a hit returns exactly what recomputing would.
#[derive(Debug, Default)]
pub struct CatalogView {
    key: Option<(u64, CatalogScope, FilterSpec)>,
    products: Vec<Product>,
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(
        &mut self,
        listing: &Listing<Product>,
        scope: &CatalogScope,
        spec: &FilterSpec,
    ) -> &[Product] {
        if !self.is_cached(listing.revision, scope, spec) {
            self.products = apply(&listing.items, spec);
            self.key = Some((listing.revision, scope.clone(), spec.clone()));
        }
        &self.products
    }

    /// Whether the next call with these inputs will be served from the cache.
    pub fn is_cached(&self, revision: u64, scope: &CatalogScope, spec: &FilterSpec) -> bool {
        matches!(
            &self.key,
            Some((r, cached_scope, cached)) if *r == revision && cached_scope == scope && cached == spec
        )
    }
}
