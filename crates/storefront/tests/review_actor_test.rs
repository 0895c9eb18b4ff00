//! Review actor with a mocked Order collection.
//!
//! The purchase check in `on_create` goes through `OrderClient::has_purchased`, which
//! issues one `find` on the Order collection. Here that collection is a
//! `MockClient<Order>`; the canned orders still pass through the real predicate, so
//! ownership, product and cancellation filtering are exercised. Products are a real
//! actor so that rating recomputation can be observed.

use actor_framework::mock::MockClient;
use actor_framework::FrameworkError;
use storefront::clients::{OrderClient, ProductClient, ReviewClient};
use storefront::fulfillment::{FulfillmentDelays, FulfillmentScheduler};
use storefront::model::{
    Order, OrderCreate, OrderId, OrderItem, OrderStatus, ProductCreate, ProductId,
    ReviewCreate, ReviewId, ReviewUpdate, UserId,
};
use storefront::order_actor::OrderError;
use storefront::product_actor;
use storefront::review_actor::{self, ReviewError};

struct Harness {
    reviews: ReviewClient,
    products: ProductClient,
    product_id: ProductId,
}

async fn harness(orders: &MockClient<Order>) -> Harness {
    let (product_actor, product_resource) = product_actor::new(8);
    tokio::spawn(product_actor.run(()));
    let products = ProductClient::new(product_resource);
    let product_id = products
        .create_product(ProductCreate {
            name: "Denim Jeans".into(),
            price: 59_000.0,
            stock: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    // The purchase check never touches fulfillment, so the scheduler is not run.
    let (_scheduler, fulfillment) = FulfillmentScheduler::new(8, FulfillmentDelays::default());
    let order_client = OrderClient::new(orders.client(), fulfillment);

    let (review_actor, review_resource) = review_actor::new(8);
    tokio::spawn(review_actor.run(order_client));

    Harness {
        reviews: ReviewClient::new(review_resource, products.clone()),
        products,
        product_id,
    }
}

fn order(id: u32, user: &str, product_id: ProductId, status: OrderStatus) -> Order {
    let mut order = Order::new(
        OrderId(id),
        OrderCreate {
            user_id: UserId::from(user),
            items: vec![OrderItem {
                product_id,
                product_name: "Denim Jeans".into(),
                product_image: None,
                quantity: 1,
                price: 59_000.0,
            }],
            total_amount: 59_000.0,
            shipping_address: "1 Main St".into(),
            contact_number: "555-0100".into(),
        },
    );
    order.status = status;
    order
}

fn review(user: &str, product_id: ProductId, rating: u8) -> ReviewCreate {
    ReviewCreate {
        product_id,
        user_id: UserId::from(user),
        user_name: user.to_string(),
        user_photo: None,
        rating,
        comment: "Nice".into(),
        photos: Vec::new(),
    }
}

#[tokio::test]
async fn test_review_requires_a_purchase() {
    let mut orders = MockClient::<Order>::new();
    // Someone else's order for the product does not count.
    orders
        .expect_list()
        .return_items(vec![order(1, "bob", ProductId(1), OrderStatus::Delivered)], 1);
    let h = harness(&orders).await;

    let err = h
        .reviews
        .add_review(review("alice", h.product_id, 5))
        .await
        .unwrap_err();
    assert_eq!(err, ReviewError::NotPurchased(h.product_id));
    assert!(h.reviews.reviews_for_product(h.product_id).await.unwrap().is_empty());
    orders.verify();
}

#[tokio::test]
async fn test_cancelled_order_does_not_qualify() {
    let mut orders = MockClient::<Order>::new();
    orders
        .expect_list()
        .return_items(vec![order(1, "alice", ProductId(1), OrderStatus::Cancelled)], 2);
    let h = harness(&orders).await;

    let err = h
        .reviews
        .add_review(review("alice", h.product_id, 5))
        .await
        .unwrap_err();
    assert_eq!(err, ReviewError::NotPurchased(h.product_id));
    orders.verify();
}

#[tokio::test]
async fn test_review_updates_product_rating() {
    let mut orders = MockClient::<Order>::new();
    orders
        .expect_list()
        .return_items(vec![order(1, "alice", ProductId(1), OrderStatus::Shipping)], 2);
    orders
        .expect_list()
        .return_items(vec![order(2, "bob", ProductId(1), OrderStatus::Delivered)], 3);
    let h = harness(&orders).await;

    let first = h
        .reviews
        .add_review(review("alice", h.product_id, 4))
        .await
        .unwrap();
    let product = h.products.product(h.product_id).await.unwrap();
    assert_eq!(product.rating, 4.0);
    assert_eq!(product.num_reviews, 1);

    h.reviews
        .add_review(review("bob", h.product_id, 2))
        .await
        .unwrap();
    let product = h.products.product(h.product_id).await.unwrap();
    assert_eq!(product.rating, 3.0);
    assert_eq!(product.num_reviews, 2);

    let edited = h
        .reviews
        .update_review(
            first.id,
            ReviewUpdate {
                rating: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.rating, 5);
    assert_eq!(h.products.product(h.product_id).await.unwrap().rating, 3.5);

    h.reviews.delete_review(first.id).await.unwrap();
    let product = h.products.product(h.product_id).await.unwrap();
    assert_eq!(product.rating, 2.0);
    assert_eq!(product.num_reviews, 1);
    orders.verify();
}

#[tokio::test]
async fn test_second_review_of_same_product_is_rejected() {
    let mut orders = MockClient::<Order>::new();
    // Only the first submission reaches the purchase check.
    orders
        .expect_list()
        .return_items(vec![order(1, "alice", ProductId(1), OrderStatus::Delivered)], 2);
    let h = harness(&orders).await;

    h.reviews
        .add_review(review("alice", h.product_id, 4))
        .await
        .unwrap();
    let err = h
        .reviews
        .add_review(review("alice", h.product_id, 1))
        .await
        .unwrap_err();
    assert_eq!(err, ReviewError::AlreadyReviewed(h.product_id));

    let mine = h.reviews.reviews_by_user(&UserId::from("alice")).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].rating, 4);
    orders.verify();
}

#[tokio::test]
async fn test_invalid_edit_keeps_review() {
    let mut orders = MockClient::<Order>::new();
    orders
        .expect_list()
        .return_items(vec![order(1, "alice", ProductId(1), OrderStatus::Delivered)], 2);
    let h = harness(&orders).await;

    let created = h
        .reviews
        .add_review(review("alice", h.product_id, 4))
        .await
        .unwrap();
    let err = h
        .reviews
        .update_review(
            created.id,
            ReviewUpdate {
                photos: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::ValidationError(_)));
    assert_eq!(h.reviews.review(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_order_lookup_failure_is_surfaced() {
    let mut orders = MockClient::<Order>::new();
    orders.expect_list().return_err(FrameworkError::ActorClosed);
    let h = harness(&orders).await;

    let err = h
        .reviews
        .add_review(review("alice", h.product_id, 4))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReviewError::Orders(OrderError::ActorCommunicationError(_))
    ));
}

#[tokio::test]
async fn test_unknown_review_is_not_found() {
    let orders = MockClient::<Order>::new();
    let h = harness(&orders).await;

    let err = h
        .reviews
        .delete_review(ReviewId(99))
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::NotFound(_)));
}
