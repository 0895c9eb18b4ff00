//! Order client against a real order actor, with and without a running scheduler.

use actor_framework::ActorClient;
use std::time::Duration;
use storefront::clients::OrderClient;
use storefront::fulfillment::{FulfillmentDelays, FulfillmentScheduler};
use storefront::model::{OrderCreate, OrderId, OrderItem, OrderStatus, ProductId, UserId};
use storefront::order_actor::{self, OrderError};

fn purchase(user: &str) -> OrderCreate {
    OrderCreate {
        user_id: UserId::from(user),
        items: vec![OrderItem {
            product_id: ProductId(1),
            product_name: "Desk Lamp".into(),
            product_image: None,
            quantity: 2,
            price: 25.0,
        }],
        total_amount: 50.0,
        shipping_address: "1 Main St".into(),
        contact_number: "555-0100".into(),
    }
}

#[tokio::test]
async fn test_order_is_removed_when_fulfillment_cannot_be_scheduled() {
    let (actor, orders) = order_actor::new(8);
    tokio::spawn(actor.run(()));
    let (scheduler, fulfillment) = FulfillmentScheduler::new(8, FulfillmentDelays::default());
    drop(scheduler);
    let client = OrderClient::new(orders, fulfillment);

    let result = client.create_order(purchase("u1")).await;
    assert!(matches!(result, Err(OrderError::ActorCommunicationError(_))));

    assert!(client.list().await.unwrap().items.is_empty());
    assert!(client
        .orders_for_user(&UserId::from("u1"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_watch_sees_each_fulfillment_step() {
    let (actor, orders) = order_actor::new(8);
    tokio::spawn(actor.run(()));
    let delays = FulfillmentDelays {
        ship: Duration::from_millis(100),
        deliver: Duration::from_millis(200),
    };
    let (scheduler, fulfillment) = FulfillmentScheduler::new(8, delays);
    tokio::spawn(scheduler.run(orders.clone()));
    let client = OrderClient::new(orders, fulfillment);

    let order = client.create_order(purchase("u1")).await.unwrap();
    let mut watcher = client.watch_order(order.id).await.unwrap();
    assert_eq!(
        watcher.borrow_and_update().as_ref().map(|o| o.status),
        Some(OrderStatus::PaymentCompleted)
    );

    watcher.changed().await.unwrap();
    assert_eq!(
        watcher.borrow_and_update().as_ref().map(|o| o.status),
        Some(OrderStatus::Shipping)
    );

    watcher.changed().await.unwrap();
    assert_eq!(
        watcher.borrow_and_update().as_ref().map(|o| o.status),
        Some(OrderStatus::Delivered)
    );
}

#[tokio::test]
async fn test_watching_an_unknown_order_is_not_found() {
    let (actor, orders) = order_actor::new(8);
    tokio::spawn(actor.run(()));
    let (_scheduler, fulfillment) = FulfillmentScheduler::new(8, FulfillmentDelays::default());
    let client = OrderClient::new(orders, fulfillment);

    assert!(matches!(
        client.watch_order(OrderId(7)).await,
        Err(OrderError::NotFound(_))
    ));
}
