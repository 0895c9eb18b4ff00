//! # Mock Collections
//!
//! [`MockClient<T>`] hands out a real [`ResourceClient<T>`] whose requests are answered
//! from a queue of canned replies instead of a running [`ResourceActor`](crate::ResourceActor).
//! Code under test cannot tell the difference, which makes it the tool of choice for
//! testing a collection whose hooks call *another* collection.
//!
//! ## Which layer to test at
//!
//! | Layer | Setup | Example |
//! |-------|-------|---------|
//! | Client wrapper | `MockClient` only | `ProductClient` tests in the storefront crate |
//! | One collection, dependencies mocked | real actor, `MockClient` as its context | `storefront/tests/review_actor_test.rs` |
//! | Whole system | every actor running | `storefront/tests/integration_test.rs` |
//!
//! ## Expectations
//!
//! Expectations are consumed in the order they were queued. Ids given to `expect_*` are
//! compared with the incoming request. A wrong id, a wrong operation, or a request with
//! nothing queued panics inside the mock task; the caller then sees
//! [`FrameworkError::ActorDropped`]. Call [`MockClient::verify`] at the end of a test to
//! make sure nothing queued was left unused.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Coupon { code: String, percent: u8 }
//! #[derive(Debug)] enum NoUpdate {}
//! #[derive(Debug)] enum NoAction {}
//! #[derive(Debug, thiserror::Error)] #[error("coupon error")] struct CouponError;
//!
//! #[async_trait]
//! impl ActorEntity for Coupon {
//!     type Id = String; type Create = u8; type Update = NoUpdate; type Action = NoAction;
//!     type ActionResult = (); type Context = (); type Error = CouponError;
//!     fn from_create_params(code: String, percent: u8) -> Result<Self, Self::Error> {
//!         Ok(Self { code, percent })
//!     }
//!     async fn on_update(&mut self, update: NoUpdate, _: &()) -> Result<(), Self::Error> { match update {} }
//!     async fn handle_action(&mut self, action: NoAction, _: &()) -> Result<(), Self::Error> { match action {} }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut coupons = MockClient::<Coupon>::new();
//!     coupons
//!         .expect_get("SPRING".into())
//!         .return_ok(Some(Coupon { code: "SPRING".into(), percent: 10 }));
//!     // Failures that a real actor would rarely produce
//!     coupons.expect_get("SUMMER".into()).return_err(FrameworkError::ActorClosed);
//!
//!     let client = coupons.client();
//!     assert_eq!(client.get("SPRING".into()).await.unwrap().unwrap().percent, 10);
//!     assert!(matches!(
//!         client.get("SUMMER".into()).await,
//!         Err(FrameworkError::ActorClosed)
//!     ));
//!     coupons.verify();
//! }
//! ```
//!
//! ## Channel-level helpers
//!
//! When a test needs to look at the request payload itself (the params of a `Create`,
//! the variant of an `Action`), use [`create_mock_client`] and answer requests by hand
//! with [`expect_create`], [`expect_get`] or [`expect_action`].

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Listing, ResourceRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch};

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: ActorEntity>(queue: &Queue<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One queued request: the id it must carry (if any) and the canned reply.
struct Expectation<T: ActorEntity> {
    id: Option<T::Id>,
    reply: Reply<T>,
}

enum Reply<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Delete(Result<(), FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
    List(Result<Listing<T>, FrameworkError>),
    Watch(Result<watch::Receiver<Option<T>>, FrameworkError>),
}

impl<T: ActorEntity> Reply<T> {
    fn operation(&self) -> &'static str {
        match self {
            Reply::Get(_) => "get",
            Reply::Create(_) => "create",
            Reply::Update(_) => "update",
            Reply::Delete(_) => "delete",
            Reply::Action(_) => "action",
            Reply::List(_) => "list",
            Reply::Watch(_) => "watch",
        }
    }
}

fn operation<T: ActorEntity>(request: &ResourceRequest<T>) -> &'static str {
    match request {
        ResourceRequest::Get { .. } => "get",
        ResourceRequest::Create { .. } | ResourceRequest::CreateWithId { .. } => "create",
        ResourceRequest::Update { .. } => "update",
        ResourceRequest::Delete { .. } => "delete",
        ResourceRequest::Action { .. } => "action",
        ResourceRequest::List { .. } => "list",
        ResourceRequest::Watch { .. } => "watch",
    }
}

fn respond<R>(respond_to: Response<R>, reply: Result<R, FrameworkError>) {
    // The caller may have given up waiting.
    let _ = respond_to.send(reply);
}

fn answer<T: ActorEntity>(request: ResourceRequest<T>, expected: Expectation<T>) {
    let Expectation { id: want, reply } = expected;
    let check = |op: &str, id: &T::Id| {
        if let Some(want) = &want {
            assert_eq!(id, want, "{op} called with unexpected id");
        }
    };

    match (request, reply) {
        (ResourceRequest::Get { id, respond_to }, Reply::Get(reply)) => {
            check("get", &id);
            respond(respond_to, reply);
        }
        (ResourceRequest::Create { respond_to, .. }, Reply::Create(reply)) => {
            respond(respond_to, reply);
        }
        (ResourceRequest::CreateWithId { id, respond_to, .. }, Reply::Create(reply)) => {
            check("create", &id);
            respond(respond_to, reply);
        }
        (ResourceRequest::Update { id, respond_to, .. }, Reply::Update(reply)) => {
            check("update", &id);
            respond(respond_to, reply);
        }
        (ResourceRequest::Delete { id, respond_to }, Reply::Delete(reply)) => {
            check("delete", &id);
            respond(respond_to, reply);
        }
        (ResourceRequest::Action { id, respond_to, .. }, Reply::Action(reply)) => {
            check("action", &id);
            respond(respond_to, reply);
        }
        (ResourceRequest::List { filter, respond_to }, Reply::List(reply)) => {
            // Canned listings still go through the caller's predicate.
            let reply = reply.map(|listing| Listing {
                items: listing
                    .items
                    .into_iter()
                    .filter(|item| filter.as_ref().is_none_or(|f| f.matches(item)))
                    .collect(),
                revision: listing.revision,
            });
            respond(respond_to, reply);
        }
        (ResourceRequest::Watch { id, respond_to }, Reply::Watch(reply)) => {
            check("watch", &id);
            respond(respond_to, reply);
        }
        (request, reply) => panic!(
            "expected a {} request, got {}",
            reply.operation(),
            operation(&request)
        ),
    }
}

/// A collection stand-in answering from queued expectations.
///
/// Must be created inside a tokio runtime.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    queue: Queue<T>,
    _task: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let queue: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let pending = queue.clone();

        let task = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = lock(&pending).pop_front();
                match next {
                    Some(expected) => answer(request, expected),
                    None => panic!("unexpected {} request", operation(&request)),
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            queue,
            _task: task,
        }
    }

    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn expect<R>(&self, id: Option<T::Id>, wrap: fn(Result<R, FrameworkError>) -> Reply<T>) -> Expect<T, R> {
        Expect {
            queue: self.queue.clone(),
            id,
            wrap,
        }
    }

    pub fn expect_get(&mut self, id: T::Id) -> Expect<T, Option<T>> {
        self.expect(Some(id), Reply::Get)
    }

    /// Matches both `create` and `create_with_id`.
    pub fn expect_create(&mut self) -> Expect<T, T::Id> {
        self.expect(None, Reply::Create)
    }

    pub fn expect_update(&mut self, id: T::Id) -> Expect<T, T> {
        self.expect(Some(id), Reply::Update)
    }

    pub fn expect_delete(&mut self, id: T::Id) -> Expect<T, ()> {
        self.expect(Some(id), Reply::Delete)
    }

    pub fn expect_action(&mut self, id: T::Id) -> Expect<T, T::ActionResult> {
        self.expect(Some(id), Reply::Action)
    }

    /// Matches both `list` and `find`. The canned items are filtered by the request's
    /// predicate before being returned.
    pub fn expect_list(&mut self) -> Expect<T, Listing<T>> {
        self.expect(None, Reply::List)
    }

    /// The test keeps the `watch::Sender` and pushes values through it.
    pub fn expect_watch(&mut self, id: T::Id) -> Expect<T, watch::Receiver<Option<T>>> {
        self.expect(Some(id), Reply::Watch)
    }

    /// Panics if any queued expectation was never consumed.
    pub fn verify(&self) {
        let queue = lock(&self.queue);
        if !queue.is_empty() {
            let left: Vec<_> = queue.iter().map(|e| e.reply.operation()).collect();
            panic!("Not all expectations were met. {} remaining: {:?}", left.len(), left);
        }
    }
}

/// A pending expectation; finish it with `return_ok` or `return_err`.
#[must_use = "an expectation is only queued by return_ok or return_err"]
pub struct Expect<T: ActorEntity, R> {
    queue: Queue<T>,
    id: Option<T::Id>,
    wrap: fn(Result<R, FrameworkError>) -> Reply<T>,
}

impl<T: ActorEntity, R> Expect<T, R> {
    pub fn return_ok(self, value: R) {
        self.queue_reply(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.queue_reply(Err(error));
    }

    fn queue_reply(self, reply: Result<R, FrameworkError>) {
        let expectation = Expectation {
            id: self.id,
            reply: (self.wrap)(reply),
        };
        lock(&self.queue).push_back(expectation);
    }
}

impl<T: ActorEntity> Expect<T, Listing<T>> {
    /// Shorthand for `return_ok(Listing { items, revision })`.
    pub fn return_items(self, items: Vec<T>, revision: u64) {
        self.return_ok(Listing { items, revision });
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// A client whose requests land on `receiver`, to be answered by the test itself.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request if it is a `Create`, with its params and reply channel.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Response<T::Id>)> {
    let Some(ResourceRequest::Create { params, respond_to }) = receiver.recv().await else {
        return None;
    };
    Some((params, respond_to))
}

/// Next request if it is a `Get`.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    let Some(ResourceRequest::Get { id, respond_to }) = receiver.recv().await else {
        return None;
    };
    Some((id, respond_to))
}

/// Next request if it is an `Action`.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    let Some(ResourceRequest::Action {
        id,
        action,
        respond_to,
    }) = receiver.recv().await
    else {
        return None;
    };
    Some((id, action, respond_to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Coupon {
        code: String,
        percent: u8,
    }

    #[derive(Debug)]
    struct CouponUpdate {
        percent: u8,
    }

    #[derive(Debug)]
    enum CouponAction {
        Redeem,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("coupon error")]
    struct CouponError;

    #[async_trait]
    impl ActorEntity for Coupon {
        type Id = String;
        type Create = u8;
        type Update = CouponUpdate;
        type Action = CouponAction;
        type ActionResult = bool;
        type Context = ();
        type Error = CouponError;

        fn from_create_params(code: String, percent: u8) -> Result<Self, Self::Error> {
            Ok(Self { code, percent })
        }

        async fn on_update(&mut self, update: CouponUpdate, _ctx: &()) -> Result<(), Self::Error> {
            self.percent = update.percent;
            Ok(())
        }

        async fn handle_action(&mut self, _action: CouponAction, _ctx: &()) -> Result<bool, Self::Error> {
            Ok(true)
        }
    }

    fn coupon(code: &str, percent: u8) -> Coupon {
        Coupon {
            code: code.to_string(),
            percent,
        }
    }

    #[tokio::test]
    async fn test_channel_helpers_expose_payloads() {
        let (client, mut receiver) = create_mock_client::<Coupon>(4);

        let create = tokio::spawn(async move { client.create(15).await });
        let (percent, responder) = expect_create(&mut receiver).await.unwrap();
        assert_eq!(percent, 15);
        responder.send(Ok("SPRING".to_string())).unwrap();

        assert_eq!(create.await.unwrap().unwrap(), "SPRING");
    }

    #[tokio::test]
    async fn test_queued_replies_are_served_in_order() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_create().return_ok("SPRING".into());
        mock.expect_get("SPRING".into()).return_ok(Some(coupon("SPRING", 10)));
        mock.expect_action("SPRING".into()).return_ok(true);
        let client = mock.client();

        assert_eq!(client.create_with_id("SPRING".into(), 10).await.unwrap(), "SPRING");
        assert_eq!(client.get("SPRING".into()).await.unwrap(), Some(coupon("SPRING", 10)));
        assert!(client
            .perform_action("SPRING".into(), CouponAction::Redeem)
            .await
            .unwrap());
        mock.verify();
    }

    #[tokio::test]
    async fn test_list_applies_request_filter() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_list()
            .return_items(vec![coupon("SPRING", 10), coupon("SUMMER", 25)], 7);

        let listing = mock
            .client()
            .find(|c: &Coupon| c.percent > 20)
            .await
            .unwrap();
        assert_eq!(listing.revision, 7);
        assert_eq!(listing.items, vec![coupon("SUMMER", 25)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_update("SPRING".into()).return_ok(coupon("SPRING", 30));
        mock.expect_delete("SPRING".into())
            .return_err(FrameworkError::NotFound("SPRING".into()));
        let client = mock.client();

        let updated = client
            .update("SPRING".into(), CouponUpdate { percent: 30 })
            .await
            .unwrap();
        assert_eq!(updated.percent, 30);
        assert!(matches!(
            client.delete("SPRING".into()).await,
            Err(FrameworkError::NotFound(code)) if code == "SPRING"
        ));
        mock.verify();
    }

    #[tokio::test]
    async fn test_watch_hands_out_the_queued_receiver() {
        let mut mock = MockClient::<Coupon>::new();
        let (updates, receiver) = watch::channel(Some(coupon("SPRING", 10)));
        mock.expect_watch("SPRING".into()).return_ok(receiver);

        let mut watcher = mock.client().watch("SPRING".into()).await.unwrap();
        updates.send_replace(Some(coupon("SPRING", 20)));
        watcher.changed().await.unwrap();
        assert_eq!(watcher.borrow_and_update().as_ref().map(|c| c.percent), Some(20));
        mock.verify();
    }

    #[tokio::test]
    async fn test_wrong_id_drops_the_request() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_get("SPRING".into()).return_ok(None);

        let result = mock.client().get("WINTER".into()).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_unused_expectations() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_list().return_items(Vec::new(), 0);
        mock.verify();
    }
}
