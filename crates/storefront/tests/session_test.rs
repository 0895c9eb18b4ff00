//! Session against real review, cart and wishlist actors with the product and order
//! collections mocked, so that a single product read can be made to fail.

use actor_framework::mock::MockClient;
use actor_framework::FrameworkError;
use storefront::clients::{
    CartClient, OrderClient, ProductClient, ReviewClient, StoreClients, WishlistClient,
};
use storefront::fulfillment::{FulfillmentDelays, FulfillmentScheduler};
use storefront::model::{
    Order, OrderCreate, OrderId, OrderItem, Product, ProductCreate, ProductId, User, UserId,
};
use storefront::product_actor::ProductActionResult;
use storefront::session::{Feature, Session};
use storefront::{cart_actor, review_actor, wishlist_actor};

fn lamp() -> Product {
    Product::new(
        ProductId(1),
        ProductCreate {
            name: "Desk Lamp".into(),
            price: 20_000.0,
            category: "furniture".into(),
            stock: 5,
            ..Default::default()
        },
    )
}

fn lamp_order(user: &str) -> Order {
    Order::new(
        OrderId(1),
        OrderCreate {
            user_id: UserId::from(user),
            items: vec![OrderItem {
                product_id: ProductId(1),
                product_name: "Desk Lamp".into(),
                product_image: None,
                quantity: 1,
                price: 20_000.0,
            }],
            total_amount: 20_000.0,
            shipping_address: "1 Main St".into(),
            contact_number: "555-0100".into(),
        },
    )
}

fn session(products: &MockClient<Product>, orders: &MockClient<Order>) -> Session {
    let products = ProductClient::new(products.client());
    let (_scheduler, fulfillment) = FulfillmentScheduler::new(8, FulfillmentDelays::default());
    let order_client = OrderClient::new(orders.client(), fulfillment);

    let (cart_actor, cart_resource) = cart_actor::new(8);
    tokio::spawn(cart_actor.run(products.clone()));
    let (wishlist_actor, wishlist_resource) = wishlist_actor::new(8);
    tokio::spawn(wishlist_actor.run(products.clone()));
    let (review_actor, review_resource) = review_actor::new(8);
    tokio::spawn(review_actor.run(order_client.clone()));

    Session::new(StoreClients {
        carts: CartClient::new(cart_resource, products.clone()),
        wishlists: WishlistClient::new(wishlist_resource, products.clone()),
        reviews: ReviewClient::new(review_resource, products.clone()),
        orders: order_client,
        products,
    })
}

#[tokio::test]
async fn test_review_is_kept_when_the_catalog_refresh_fails() {
    let mut products = MockClient::<Product>::new();
    let mut orders = MockClient::<Order>::new();
    // sign in, then the purchase check of the review
    orders.expect_list().return_items(vec![lamp_order("alice")], 1);
    orders.expect_list().return_items(vec![lamp_order("alice")], 1);
    // catalog load, rating refresh, catalog reload after the review
    products.expect_list().return_items(vec![lamp()], 1);
    products
        .expect_action(ProductId(1))
        .return_ok(ProductActionResult::ApplyReviewStats(true));
    products.expect_list().return_err(FrameworkError::ActorClosed);

    let mut session = session(&products, &orders);
    session.sign_in(User::new("alice", "Alice")).await.unwrap();
    session.load_catalog().await.unwrap();

    let review = session
        .submit_review(ProductId(1), 4, "Bright enough", Vec::new())
        .await
        .unwrap();
    assert_eq!(review.rating, 4);
    assert!(session.errors().get(Feature::Products).is_some());
    // The stale catalog is still shown.
    assert_eq!(session.catalog().revision, 1);

    products.verify();
    orders.verify();
}
