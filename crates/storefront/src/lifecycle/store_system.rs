use crate::clients::{
    CartClient, OrderClient, ProductClient, ReviewClient, StoreClients, WishlistClient,
};
use crate::config::StoreConfig;
use crate::fulfillment::FulfillmentScheduler;
use crate::session::Session;
use crate::{cart_actor, order_actor, product_actor, review_actor, wishlist_actor};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running storefront: one actor per collection plus the fulfillment scheduler.
///
/// # Example
///
/// ```ignore
/// let system = StoreSystem::new(StoreConfig::from_env()?);
/// system.clients.products.seed_products(catalog).await?;
///
/// let mut session = system.session();
/// session.sign_in(user).await?;
/// // ...
/// drop(session);
/// system.shutdown().await?;
/// ```
pub struct StoreSystem {
    pub clients: StoreClients,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl StoreSystem {
    /// Spawns every actor. Must be called inside a tokio runtime.
    pub fn new(config: StoreConfig) -> Self {
        let buffer = config.actor_buffer;

        let (product_actor, product_resource_client) = product_actor::new(buffer);
        let products = ProductClient::new(product_resource_client);

        let (order_actor, order_resource_client) = order_actor::new(buffer);
        let (scheduler, fulfillment) =
            FulfillmentScheduler::new(buffer, config.fulfillment_delays());
        let orders = OrderClient::new(order_resource_client.clone(), fulfillment);

        let (cart_actor, cart_resource_client) = cart_actor::new(buffer);
        let carts = CartClient::new(cart_resource_client, products.clone());

        let (wishlist_actor, wishlist_resource_client) = wishlist_actor::new(buffer);
        let wishlists = WishlistClient::new(wishlist_resource_client, products.clone());

        let (review_actor, review_resource_client) = review_actor::new(buffer);
        let reviews = ReviewClient::new(review_resource_client, products.clone());

        let handles = vec![
            ("product", tokio::spawn(product_actor.run(()))),
            ("order", tokio::spawn(order_actor.run(()))),
            (
                "fulfillment",
                tokio::spawn(scheduler.run(order_resource_client)),
            ),
            ("cart", tokio::spawn(cart_actor.run(products.clone()))),
            ("wishlist", tokio::spawn(wishlist_actor.run(products.clone()))),
            ("review", tokio::spawn(review_actor.run(orders.clone()))),
        ];

        info!(
            ship_ms = config.ship_delay.as_millis() as u64,
            deliver_ms = config.deliver_delay.as_millis() as u64,
            buffer,
            "Store system started"
        );

        Self {
            clients: StoreClients {
                products,
                carts,
                wishlists,
                orders,
                reviews,
            },
            handles,
        }
    }

    /// A fresh, signed-out session sharing this system's collections.
    pub fn session(&self) -> Session {
        Session::new(self.clients.clone())
    }

    /// Drops the system's clients and waits for every actor to stop.
    ///
    /// Sessions hold clients too; drop them first or this waits forever.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down store system...");
        drop(self.clients);

        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(actor = name, "Actor task failed: {:?}", e);
                return Err(format!("{name} actor task failed: {e:?}"));
            }
        }

        info!("Store system shutdown complete.");
        Ok(())
    }
}
