//! Storefront demo: seeds a catalog, walks one shopper through browsing, checkout,
//! cancellation and a review, then waits for the remaining order to be delivered.
//!
//! ```bash
//! RUST_LOG=info STORE_SHIP_DELAY_MS=500 STORE_DELIVER_DELAY_MS=500 cargo run -p storefront
//! ```

use actor_framework::telemetry::setup_tracing;
use storefront::catalog::{FilterSpec, PriceRange, SortKey};
use storefront::config::StoreConfig;
use storefront::lifecycle::StoreSystem;
use storefront::model::{OrderStatus, ProductCreate, User};
use tracing::{error, info, Instrument};

fn seed_catalog() -> Vec<ProductCreate> {
    vec![
        ProductCreate {
            name: "Denim Jeans".into(),
            description: "Straight fit, dark wash".into(),
            price: 59_000.0,
            discount_percentage: Some(10.0),
            images: vec!["jeans.jpg".into()],
            category: "clothing".into(),
            stock: 20,
        },
        ProductCreate {
            name: "Sofa".into(),
            description: "Three seater in grey linen".into(),
            price: 890_000.0,
            images: vec!["sofa.jpg".into()],
            category: "furniture".into(),
            stock: 3,
            ..Default::default()
        },
        ProductCreate {
            name: "Desk Lamp".into(),
            description: "Warm LED, adjustable arm".into(),
            price: 35_000.0,
            images: vec!["lamp.jpg".into()],
            category: "furniture".into(),
            stock: 50,
            ..Default::default()
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = StoreConfig::from_env().map_err(|e| e.to_string())?;
    let system = StoreSystem::new(config);

    let ids = system
        .clients
        .products
        .seed_products(seed_catalog())
        .await
        .map_err(|e| e.to_string())?;
    info!(count = ids.len(), "Catalog seeded");

    let mut session = system.session();
    session
        .sign_in(User::new("alice", "Alice"))
        .await
        .map_err(|e| e.to_string())?;

    // Browse
    session.load_catalog().await.map_err(|e| e.to_string())?;
    session.set_filters(FilterSpec {
        category: Some("furniture".into()),
        price_range: Some(PriceRange::new(0.0, 100_000.0)),
        search: "de".into(),
        sort: SortKey::PriceAsc,
    });
    for product in session.filtered_products() {
        info!(product_id = %product.id, name = %product.name, price = product.price, "Match");
    }

    // Two orders: the first is cancelled, the second runs to delivery.
    let span = tracing::info_span!("checkout");
    let (cancelled, kept) = async {
        session.add_to_cart(ids[2], 1).await?;
        let first = session.checkout("1 Main St", "", "555-0100").await?;

        session.add_to_cart(ids[0], 2).await?;
        info!(total = session.cart_total(), count = session.cart_count(), "Cart ready");
        let second = session.checkout("1 Main St", "Apt 2", "555-0100").await?;
        Ok::<_, storefront::session::SessionError>((first, second))
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    let order = session
        .cancel_order(cancelled.id)
        .await
        .map_err(|e| e.to_string())?;
    info!(order_id = %order.id, status = %order.status, "Order cancelled");
    if let Err(e) = session.cancel_order(cancelled.id).await {
        info!(error = %e, "Second cancel rejected");
    }

    match session
        .submit_review(ids[0], 4, "Fits well", Vec::new())
        .await
    {
        Ok(review) => info!(review_id = %review.id, "Review submitted"),
        Err(e) => error!(error = %e, "Review failed"),
    }
    session.open_product(ids[0]).await.map_err(|e| e.to_string())?;
    if let Some(product) = session.current_product() {
        info!(rating = product.rating, reviews = product.num_reviews, "Product rating");
    }

    // Follow the kept order until it is delivered.
    session.open_order(kept.id).await.map_err(|e| e.to_string())?;
    let mut status = session.current_order().map(|o| o.status);
    while status != Some(OrderStatus::Delivered) {
        let Some(order) = session.next_order_update().await else {
            break;
        };
        info!(order_id = %order.id, status = %order.status, "Order update");
        status = Some(order.status);
    }
    session.load_orders().await.map_err(|e| e.to_string())?;
    for order in session.orders() {
        info!(order_id = %order.id, status = %order.status, total = order.total_amount, "Order");
    }
    info!(order_id = %kept.id, "Demo complete");

    drop(session);
    system.shutdown().await?;
    Ok(())
}
