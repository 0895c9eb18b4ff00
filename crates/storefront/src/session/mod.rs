//! # Session
//!
//! The application state of one signed-in shopper: who they are, the catalog they are
//! browsing and the filters applied to it, their cart, wishlist and orders, and the
//! product or order currently open.
//!
//! State changes only through the async actions below. Every action clears the error
//! field of its feature area when it starts and, on failure, stores the error message
//! there and returns the error, leaving the rest of the state as it was. Selectors are
//! synchronous reads of that state.
//!
//! ```rust,no_run
//! # async fn demo(system: &storefront::lifecycle::StoreSystem) -> Result<(), storefront::session::SessionError> {
//! use storefront::model::{ProductId, User};
//!
//! let mut session = system.session();
//! session.sign_in(User::new("u1", "Alice")).await?;
//! session.load_catalog().await?;
//! session.add_to_cart(ProductId(1), 2).await?;
//! let order = session.checkout("1 Main St", "Apt 2", "555-0100").await?;
//! println!("{} {}", order.id, order.status);
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::SessionError;

use crate::catalog::{self, CatalogScope, CatalogView, FilterSpec};
use crate::clients::StoreClients;
use crate::model::{
    CartLine, Order, OrderCreate, OrderId, OrderItem, Product, ProductId, Review,
    ReviewCreate, ReviewId, ReviewUpdate, User, UserId, WishlistLine,
};
use actor_framework::Listing;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Feature areas with their own error field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Auth,
    Cart,
    Orders,
    Products,
    Wishlist,
}

/// Last error message per feature area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureErrors {
    pub auth: Option<String>,
    pub cart: Option<String>,
    pub orders: Option<String>,
    pub products: Option<String>,
    pub wishlist: Option<String>,
}

impl FeatureErrors {
    pub fn get(&self, feature: Feature) -> Option<&str> {
        self.slot(feature).as_deref()
    }

    fn slot(&self, feature: Feature) -> &Option<String> {
        match feature {
            Feature::Auth => &self.auth,
            Feature::Cart => &self.cart,
            Feature::Orders => &self.orders,
            Feature::Products => &self.products,
            Feature::Wishlist => &self.wishlist,
        }
    }

    fn slot_mut(&mut self, feature: Feature) -> &mut Option<String> {
        match feature {
            Feature::Auth => &mut self.auth,
            Feature::Cart => &mut self.cart,
            Feature::Orders => &mut self.orders,
            Feature::Products => &mut self.products,
            Feature::Wishlist => &mut self.wishlist,
        }
    }

    fn clear(&mut self, feature: Feature) {
        *self.slot_mut(feature) = None;
    }

    fn record<T>(
        &mut self,
        feature: Feature,
        result: Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        if let Err(e) = &result {
            warn!(?feature, error = %e, "Action failed");
            *self.slot_mut(feature) = Some(e.to_string());
        }
        result
    }
}

pub struct Session {
    clients: StoreClients,
    user: Option<User>,
    filters: FilterSpec,
    catalog: Listing<Product>,
    catalog_scope: CatalogScope,
    view: CatalogView,
    cart: Vec<CartLine>,
    wishlist: Vec<WishlistLine>,
    orders: Vec<Order>,
    current_order: Option<Order>,
    order_watch: Option<watch::Receiver<Option<Order>>>,
    current_product: Option<Product>,
    product_reviews: Vec<Review>,
    my_reviews: Vec<Review>,
    errors: FeatureErrors,
}

impl Session {
    pub fn new(clients: StoreClients) -> Self {
        Self {
            clients,
            user: None,
            filters: FilterSpec::default(),
            catalog: Listing::default(),
            catalog_scope: CatalogScope::All,
            view: CatalogView::new(),
            cart: Vec::new(),
            wishlist: Vec::new(),
            orders: Vec::new(),
            current_order: None,
            order_watch: None,
            current_product: None,
            product_reviews: Vec::new(),
            my_reviews: Vec::new(),
            errors: FeatureErrors::default(),
        }
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Signs in a user already authenticated by the identity provider and loads their
    /// cart, wishlist and orders.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn sign_in(&mut self, user: User) -> Result<(), SessionError> {
        self.errors.clear(Feature::Auth);
        let result = self.load_user_state(user).await;
        self.errors.record(Feature::Auth, result)
    }

    async fn load_user_state(&mut self, user: User) -> Result<(), SessionError> {
        let cart = self.clients.carts.cart_lines(&user.id).await?;
        let wishlist = self.clients.wishlists.wishlist_lines(&user.id).await?;
        let orders = self.clients.orders.orders_for_user(&user.id).await?;
        info!(
            cart = cart.len(),
            wishlist = wishlist.len(),
            orders = orders.len(),
            "Signed in"
        );
        self.cart = cart;
        self.wishlist = wishlist;
        self.orders = orders;
        self.current_order = None;
        self.order_watch = None;
        self.my_reviews.clear();
        self.user = Some(user);
        Ok(())
    }

    /// Drops everything tied to the user. The catalog and filters stay.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "Signed out");
        }
        self.cart.clear();
        self.wishlist.clear();
        self.orders.clear();
        self.current_order = None;
        self.order_watch = None;
        self.my_reviews.clear();
        self.errors = FeatureErrors::default();
    }

    /// Loads the whole catalog.
    pub async fn load_catalog(&mut self) -> Result<(), SessionError> {
        self.load_scope(CatalogScope::All).await
    }

    /// Loads only the products of `category`. The narrowing happens in the product
    /// collection; the filters then apply on top of it.
    pub async fn load_category(&mut self, category: &str) -> Result<(), SessionError> {
        self.load_scope(CatalogScope::Category(category.to_string()))
            .await
    }

    #[instrument(skip(self))]
    async fn load_scope(&mut self, scope: CatalogScope) -> Result<(), SessionError> {
        self.errors.clear(Feature::Products);
        let result = self
            .clients
            .products
            .catalog_in(&scope)
            .await
            .map_err(SessionError::from);
        let result = result.map(|listing| {
            debug!(products = listing.items.len(), revision = listing.revision, "Catalog loaded");
            self.catalog = listing;
            self.catalog_scope = scope;
        });
        self.errors.record(Feature::Products, result)
    }

    pub fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
    }

    /// Opens a product page: the product and its reviews, newest first.
    #[instrument(skip(self))]
    pub async fn open_product(&mut self, product_id: ProductId) -> Result<(), SessionError> {
        self.errors.clear(Feature::Products);
        let result = self.load_product(product_id).await;
        self.errors.record(Feature::Products, result)
    }

    async fn load_product(&mut self, product_id: ProductId) -> Result<(), SessionError> {
        let product = self.clients.products.product(product_id).await?;
        let reviews = self.clients.reviews.reviews_for_product(product_id).await?;
        self.current_product = Some(product);
        self.product_reviews = reviews;
        Ok(())
    }

    pub async fn refresh_cart(&mut self) -> Result<(), SessionError> {
        self.errors.clear(Feature::Cart);
        let result = self.reload_cart().await;
        self.errors.record(Feature::Cart, result)
    }

    async fn reload_cart(&mut self) -> Result<(), SessionError> {
        let user_id = self.require_user()?;
        self.cart = self.clients.carts.cart_lines(&user_id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), SessionError> {
        self.errors.clear(Feature::Cart);
        let result = self.change_cart(CartChange::Add(product_id, quantity)).await;
        self.errors.record(Feature::Cart, result)
    }

    /// Sets a line's quantity; zero or less removes it.
    #[instrument(skip(self))]
    pub async fn update_cart_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), SessionError> {
        self.errors.clear(Feature::Cart);
        let result = self.change_cart(CartChange::Set(product_id, quantity)).await;
        self.errors.record(Feature::Cart, result)
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(&mut self, product_id: ProductId) -> Result<(), SessionError> {
        self.errors.clear(Feature::Cart);
        let result = self.change_cart(CartChange::Remove(product_id)).await;
        self.errors.record(Feature::Cart, result)
    }

    async fn change_cart(&mut self, change: CartChange) -> Result<(), SessionError> {
        let user_id = self.require_user()?;
        let carts = &self.clients.carts;
        match change {
            CartChange::Add(product_id, quantity) => {
                carts.add_to_cart(&user_id, product_id, quantity).await?
            }
            CartChange::Set(product_id, quantity) => {
                carts.update_quantity(&user_id, product_id, quantity).await?
            }
            CartChange::Remove(product_id) => carts.remove_item(&user_id, product_id).await?,
        };
        self.cart = carts.cart_lines(&user_id).await?;
        Ok(())
    }

    /// Adds the product to the wishlist, or removes it if already there. Returns whether
    /// it is wishlisted afterwards.
    #[instrument(skip(self))]
    pub async fn toggle_wishlist(&mut self, product_id: ProductId) -> Result<bool, SessionError> {
        self.errors.clear(Feature::Wishlist);
        let result = self.flip_wishlist(product_id).await;
        self.errors.record(Feature::Wishlist, result)
    }

    async fn flip_wishlist(&mut self, product_id: ProductId) -> Result<bool, SessionError> {
        let user_id = self.require_user()?;
        let wishlists = &self.clients.wishlists;
        let wishlisted = if self.is_wishlisted(product_id) {
            wishlists.remove(&user_id, product_id).await?;
            false
        } else {
            wishlists.add(&user_id, product_id).await?;
            true
        };
        self.wishlist = wishlists.wishlist_lines(&user_id).await?;
        Ok(wishlisted)
    }

    /// Places an order for everything in the cart and empties the cart.
    ///
    /// Line items are priced at the discounted unit price of the current product
    /// records. The shipping address is `"address1, address2"` (just `address1` when the
    /// second line is blank).
    ///
    /// # Errors
    /// - `SignInRequired` (recorded as an auth error)
    /// - `Validation` for an empty cart, a blank address or a blank contact, before any
    ///   store call
    #[instrument(skip(self, address1, address2, contact))]
    pub async fn checkout(
        &mut self,
        address1: &str,
        address2: &str,
        contact: &str,
    ) -> Result<Order, SessionError> {
        let user_id = match self.require_user() {
            Ok(user_id) => user_id,
            Err(e) => {
                self.errors.clear(Feature::Auth);
                return self.errors.record(Feature::Auth, Err(e));
            }
        };
        self.errors.clear(Feature::Orders);
        let result = self.place_order(user_id, address1, address2, contact).await;
        self.errors.record(Feature::Orders, result)
    }

    async fn place_order(
        &mut self,
        user_id: UserId,
        address1: &str,
        address2: &str,
        contact: &str,
    ) -> Result<Order, SessionError> {
        if self.cart.is_empty() {
            return Err(SessionError::Validation("Cart is empty".into()));
        }
        let address1 = address1.trim();
        let address2 = address2.trim();
        let contact = contact.trim();
        if address1.is_empty() {
            return Err(SessionError::Validation("Shipping address is required".into()));
        }
        if contact.is_empty() {
            return Err(SessionError::Validation("Contact number is required".into()));
        }

        let lines = self.clients.carts.cart_lines(&user_id).await?;
        if lines.is_empty() {
            return Err(SessionError::Validation("Cart is empty".into()));
        }
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product.id,
                product_name: line.product.name.clone(),
                product_image: line.product.thumbnail().map(str::to_string),
                quantity: line.quantity,
                price: line.product.effective_price(),
            })
            .collect();
        let total_amount: f64 = items.iter().map(OrderItem::subtotal).sum();
        let shipping_address = if address2.is_empty() {
            address1.to_string()
        } else {
            format!("{address1}, {address2}")
        };

        let order = self
            .clients
            .orders
            .create_order(OrderCreate {
                user_id: user_id.clone(),
                items,
                total_amount,
                shipping_address,
                contact_number: contact.to_string(),
            })
            .await?;
        info!(order_id = %order.id, total = order.total_amount, "Checkout complete");

        self.orders.insert(0, order.clone());
        self.current_order = Some(order.clone());
        self.track_order(order.id).await;
        // The order exists from here on; a failed clear only leaves a stale cart.
        match self.clients.carts.clear(&user_id).await {
            Ok(_) => self.cart.clear(),
            Err(e) => {
                warn!(error = %e, "Cart not cleared after checkout");
                self.errors.cart = Some(e.to_string());
            }
        }
        Ok(order)
    }

    /// Reloads the user's orders, newest first.
    pub async fn load_orders(&mut self) -> Result<(), SessionError> {
        self.errors.clear(Feature::Orders);
        let result = self.reload_orders().await;
        self.errors.record(Feature::Orders, result)
    }

    async fn reload_orders(&mut self) -> Result<(), SessionError> {
        let user_id = self.require_user()?;
        self.orders = self.clients.orders.orders_for_user(&user_id).await?;
        Ok(())
    }

    /// Loads one order as the current order and starts following it.
    pub async fn open_order(&mut self, id: OrderId) -> Result<(), SessionError> {
        self.errors.clear(Feature::Orders);
        let result = self.clients.orders.order(id).await.map_err(SessionError::from);
        if let Ok(order) = &result {
            self.current_order = Some(order.clone());
            self.track_order(id).await;
        }
        self.errors.record(Feature::Orders, result.map(|_| ()))
    }

    /// Subscribes to changes of the current order. Without a subscription the order is
    /// still shown, only its updates need a reload.
    async fn track_order(&mut self, id: OrderId) {
        self.order_watch = match self.clients.orders.watch_order(id).await {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(order_id = %id, error = %e, "Order updates unavailable");
                None
            }
        };
    }

    /// Waits for the next change to the current order and applies it to the order list
    /// and the current order.
    ///
    /// Returns `None` once nothing is tracked: no order was opened, the order was
    /// deleted, or the order collection shut down.
    pub async fn next_order_update(&mut self) -> Option<&Order> {
        let watcher = self.order_watch.as_mut()?;
        if watcher.changed().await.is_err() {
            self.order_watch = None;
            return None;
        }
        let latest = watcher.borrow_and_update().clone();
        match latest {
            Some(order) => {
                debug!(order_id = %order.id, status = %order.status, "Order updated");
                self.replace_order(&order);
                self.current_order = Some(order);
                self.current_order.as_ref()
            }
            None => {
                self.order_watch = None;
                None
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&mut self, id: OrderId) -> Result<Order, SessionError> {
        self.errors.clear(Feature::Orders);
        let result = self.clients.orders.cancel_order(id).await.map_err(SessionError::from);
        if let Ok(order) = &result {
            self.replace_order(order);
        }
        self.errors.record(Feature::Orders, result)
    }

    fn replace_order(&mut self, order: &Order) {
        if let Some(existing) = self.orders.iter_mut().find(|o| o.id == order.id) {
            *existing = order.clone();
        }
        if self.current_order.as_ref().is_some_and(|o| o.id == order.id) {
            self.current_order = Some(order.clone());
        }
    }

    /// Reviews `product_id` as the signed-in user.
    #[instrument(skip(self, comment, photos))]
    pub async fn submit_review(
        &mut self,
        product_id: ProductId,
        rating: u8,
        comment: &str,
        photos: Vec<String>,
    ) -> Result<Review, SessionError> {
        self.errors.clear(Feature::Products);
        let result = self.write_review(product_id, rating, comment, photos).await;
        self.errors.record(Feature::Products, result)
    }

    async fn write_review(
        &mut self,
        product_id: ProductId,
        rating: u8,
        comment: &str,
        photos: Vec<String>,
    ) -> Result<Review, SessionError> {
        let user = self.user.clone().ok_or(SessionError::SignInRequired)?;
        let review = self
            .clients
            .reviews
            .add_review(ReviewCreate {
                product_id,
                user_id: user.id,
                user_name: user.display_name,
                user_photo: user.photo_url,
                rating,
                comment: comment.to_string(),
                photos,
            })
            .await?;
        self.after_review_change(product_id).await;
        Ok(review)
    }

    #[instrument(skip(self, update))]
    pub async fn edit_review(
        &mut self,
        id: ReviewId,
        update: ReviewUpdate,
    ) -> Result<Review, SessionError> {
        self.errors.clear(Feature::Products);
        let result = self.rewrite_review(id, update).await;
        self.errors.record(Feature::Products, result)
    }

    async fn rewrite_review(
        &mut self,
        id: ReviewId,
        update: ReviewUpdate,
    ) -> Result<Review, SessionError> {
        self.require_author(id).await?;
        let review = self.clients.reviews.update_review(id, update).await?;
        self.after_review_change(review.product_id).await;
        Ok(review)
    }

    #[instrument(skip(self))]
    pub async fn delete_review(&mut self, id: ReviewId) -> Result<(), SessionError> {
        self.errors.clear(Feature::Products);
        let result = self.remove_review(id).await;
        self.errors.record(Feature::Products, result)
    }

    async fn remove_review(&mut self, id: ReviewId) -> Result<(), SessionError> {
        let review = self.require_author(id).await?;
        self.clients.reviews.delete_review(id).await?;
        self.after_review_change(review.product_id).await;
        Ok(())
    }

    /// The signed-in user's own reviews, newest first.
    pub async fn load_my_reviews(&mut self) -> Result<(), SessionError> {
        self.errors.clear(Feature::Products);
        let result = self.reload_my_reviews().await;
        self.errors.record(Feature::Products, result)
    }

    async fn reload_my_reviews(&mut self) -> Result<(), SessionError> {
        let user_id = self.require_user()?;
        self.my_reviews = self.clients.reviews.reviews_by_user(&user_id).await?;
        Ok(())
    }

    async fn require_author(&self, id: ReviewId) -> Result<Review, SessionError> {
        let user_id = self.require_user()?;
        let review = self.clients.reviews.review(id).await?;
        if review.user_id != user_id {
            return Err(SessionError::Validation(
                "Only the author can change a review".into(),
            ));
        }
        Ok(review)
    }

    /// Refreshes whatever the session shows of the product after one of its reviews
    /// changed. The review itself is already stored, so a failed refresh only leaves
    /// stale views and is recorded as a products error.
    async fn after_review_change(&mut self, product_id: ProductId) {
        if let Err(e) = self.refresh_review_views(product_id).await {
            warn!(%product_id, error = %e, "Review saved, views not refreshed");
            self.errors.products = Some(e.to_string());
        }
    }

    async fn refresh_review_views(&mut self, product_id: ProductId) -> Result<(), SessionError> {
        if self
            .current_product
            .as_ref()
            .is_some_and(|product| product.id == product_id)
        {
            self.load_product(product_id).await?;
        }
        if self.catalog.items.iter().any(|product| product.id == product_id) {
            self.catalog = self.clients.products.catalog_in(&self.catalog_scope).await?;
        }
        if self.user.is_some() && !self.my_reviews.is_empty() {
            self.reload_my_reviews().await?;
        }
        Ok(())
    }

    fn require_user(&self) -> Result<UserId, SessionError> {
        self.user
            .as_ref()
            .map(|user| user.id.clone())
            .ok_or(SessionError::SignInRequired)
    }

    // =========================================================================
    // SELECTORS
    // =========================================================================

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn catalog(&self) -> &Listing<Product> {
        &self.catalog
    }

    pub fn catalog_scope(&self) -> &CatalogScope {
        &self.catalog_scope
    }

    /// The loaded catalog filtered and sorted by the current filters. Memoised on the
    /// catalog revision, its scope and the filters.
    pub fn filtered_products(&mut self) -> &[Product] {
        self.view
            .products(&self.catalog, &self.catalog_scope, &self.filters)
    }

    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    pub fn cart_total(&self) -> f64 {
        catalog::cart_total(&self.cart)
    }

    pub fn cart_count(&self) -> u32 {
        catalog::cart_count(&self.cart)
    }

    pub fn wishlist(&self) -> &[WishlistLine] {
        &self.wishlist
    }

    pub fn is_wishlisted(&self, product_id: ProductId) -> bool {
        self.wishlist
            .iter()
            .any(|line| line.product.id == product_id)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn current_order(&self) -> Option<&Order> {
        self.current_order.as_ref()
    }

    pub fn is_tracking_order(&self) -> bool {
        self.order_watch.is_some()
    }

    pub fn current_product(&self) -> Option<&Product> {
        self.current_product.as_ref()
    }

    pub fn product_reviews(&self) -> &[Review] {
        &self.product_reviews
    }

    pub fn my_reviews(&self) -> &[Review] {
        &self.my_reviews
    }

    pub fn errors(&self) -> &FeatureErrors {
        &self.errors
    }
}

enum CartChange {
    Add(ProductId, u32),
    Set(ProductId, i64),
    Remove(ProductId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_the_message_per_feature() {
        let mut errors = FeatureErrors::default();
        let result: Result<(), _> = errors.record(
            Feature::Cart,
            Err(SessionError::Validation("Cart is empty".into())),
        );
        assert!(result.is_err());
        assert_eq!(errors.get(Feature::Cart), Some("Cart is empty"));
        assert_eq!(errors.get(Feature::Orders), None);

        errors.record(Feature::Cart, Ok(())).unwrap();
        assert_eq!(errors.get(Feature::Cart), Some("Cart is empty"));
        errors.clear(Feature::Cart);
        assert_eq!(errors.get(Feature::Cart), None);
    }
}
