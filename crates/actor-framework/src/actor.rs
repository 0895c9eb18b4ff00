//! # Collection Actor
//!
//! [`ResourceActor`] owns one collection. Requests are taken off its channel one at a
//! time, so writes to the collection never interleave and no locks are needed.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Filter, Listing, ResourceRequest};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

type IdGenerator<Id> = Box<dyn FnMut() -> Id + Send + Sync>;

fn hook_failed<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}

/// Short type name for log fields, `Order` rather than `storefront::model::order::Order`.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// One collection of `T`, keyed and ordered by `T::Id`.
///
/// Construct with [`new`](Self::new) when the collection assigns ids, or with
/// [`keyed`](Self::keyed) when callers always choose them (a cart per user). Then spawn
/// [`run`](Self::run) with the clients the entity hooks need.
///
/// Every successful create, update and delete bumps the collection `revision`, which is
/// handed out with each [`Listing`]. Actions bump it only when
/// [`ActorEntity::changed_by`] says the record changed. The same changes are pushed to
/// any watcher of the record (see [`ResourceClient::watch`]).
///
/// ```rust
/// use actor_framework::{ActorEntity, FrameworkError, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Basket { owner: String, items: u32 }
/// #[derive(Debug)] enum BasketUpdate {}
/// #[derive(Debug)] enum BasketAction { Add(u32) }
/// #[derive(Debug, thiserror::Error)] #[error("basket error")] struct BasketError;
///
/// #[async_trait]
/// impl ActorEntity for Basket {
///     type Id = String;
///     type Create = ();
///     type Update = BasketUpdate;
///     type Action = BasketAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = BasketError;
///
///     fn from_create_params(owner: String, _: ()) -> Result<Self, BasketError> {
///         Ok(Self { owner, items: 0 })
///     }
///     async fn on_update(&mut self, update: BasketUpdate, _: &()) -> Result<(), BasketError> {
///         match update {}
///     }
///     async fn handle_action(&mut self, action: BasketAction, _: &()) -> Result<u32, BasketError> {
///         let BasketAction::Add(n) = action;
///         self.items += n;
///         Ok(self.items)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, baskets) = ResourceActor::<Basket>::keyed(10);
///     tokio::spawn(actor.run(()));
///
///     baskets.create_with_id("alice".into(), ()).await.unwrap();
///     assert!(matches!(
///         baskets.create_with_id("alice".into(), ()).await,
///         Err(FrameworkError::AlreadyExists(_))
///     ));
///     assert!(matches!(baskets.create(()).await, Err(FrameworkError::IdRequired)));
///
///     assert_eq!(baskets.perform_action("alice".into(), BasketAction::Add(2)).await.unwrap(), 2);
///     assert_eq!(baskets.list().await.unwrap().revision, 2);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: Option<IdGenerator<T::Id>>,
    revision: u64,
    watchers: HashMap<T::Id, watch::Sender<Option<T>>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// A collection that assigns ids itself, calling `next_id` once per `create`.
    ///
    /// `buffer_size` bounds the request channel; senders wait while it is full.
    pub fn new(
        buffer_size: usize,
        next_id: impl FnMut() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, Some(Box::new(next_id)))
    }

    /// A collection whose ids are always supplied through `create_with_id`.
    ///
    /// Plain `create` fails with [`FrameworkError::IdRequired`].
    pub fn keyed(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, None)
    }

    fn build(buffer_size: usize, next_id: Option<IdGenerator<T::Id>>) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id,
            revision: 0,
            watchers: HashMap::new(),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Serves requests until every client has been dropped.
    ///
    /// `context` is lent to each entity hook. Passing clients here rather than at
    /// construction lets all collections be created before any is wired.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = short_type_name::<T>();
        info!(entity_type, "Actor started");

        while let Some(request) = self.receiver.recv().await {
            self.dispatch(entity_type, request, &context).await;
        }

        info!(entity_type, size = self.store.len(), revision = self.revision, "Shutdown");
    }

    async fn dispatch(&mut self, entity_type: &str, request: ResourceRequest<T>, ctx: &T::Context) {
        match request {
            ResourceRequest::Create { params, respond_to } => {
                debug!(entity_type, ?params, "Create");
                let result = match self.next_id.as_mut() {
                    Some(next_id) => {
                        let id = next_id();
                        self.insert(id, params, ctx).await
                    }
                    None => Err(FrameworkError::IdRequired),
                };
                let _ = respond_to.send(outcome(entity_type, "create", result));
            }
            ResourceRequest::CreateWithId {
                id,
                params,
                respond_to,
            } => {
                debug!(entity_type, %id, ?params, "CreateWithId");
                let result = if self.store.contains_key(&id) {
                    Err(FrameworkError::AlreadyExists(id.to_string()))
                } else {
                    self.insert(id, params, ctx).await
                };
                let _ = respond_to.send(outcome(entity_type, "create", result));
            }
            ResourceRequest::Get { id, respond_to } => {
                let item = self.store.get(&id).cloned();
                debug!(entity_type, %id, found = item.is_some(), "Get");
                let _ = respond_to.send(Ok(item));
            }
            ResourceRequest::Update {
                id,
                update,
                respond_to,
            } => {
                debug!(entity_type, %id, ?update, "Update");
                let result = self.update(id, update, ctx).await;
                let _ = respond_to.send(outcome(entity_type, "update", result));
            }
            ResourceRequest::Delete { id, respond_to } => {
                debug!(entity_type, %id, "Delete");
                let result = self.delete(id, ctx).await;
                let _ = respond_to.send(outcome(entity_type, "delete", result));
            }
            ResourceRequest::Action {
                id,
                action,
                respond_to,
            } => {
                debug!(entity_type, %id, ?action, "Action");
                let result = self.act(id, action, ctx).await;
                let _ = respond_to.send(outcome(entity_type, "action", result));
            }
            ResourceRequest::List { filter, respond_to } => {
                let listing = self.listing(filter.as_ref());
                debug!(entity_type, count = listing.items.len(), revision = listing.revision, "List");
                let _ = respond_to.send(Ok(listing));
            }
            ResourceRequest::Watch { id, respond_to } => {
                let result = self.subscribe(&id);
                debug!(entity_type, %id, ok = result.is_ok(), "Watch");
                let _ = respond_to.send(result);
            }
        }
    }

    fn subscribe(&mut self, id: &T::Id) -> Result<watch::Receiver<Option<T>>, FrameworkError> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let sender = self
            .watchers
            .entry(id.clone())
            .or_insert_with(|| watch::channel(Some(item.clone())).0);
        Ok(sender.subscribe())
    }

    /// Records a change to `id`: bumps the revision and pushes the new value to watchers.
    fn changed(&mut self, id: &T::Id) {
        self.revision += 1;
        let Some(sender) = self.watchers.get(id) else {
            return;
        };
        let current = self.store.get(id).cloned();
        let gone = current.is_none();
        sender.send_replace(current);
        if gone || sender.receiver_count() == 0 {
            self.watchers.remove(id);
        }
    }

    async fn insert(
        &mut self,
        id: T::Id,
        params: T::Create,
        ctx: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let mut item = T::from_create_params(id.clone(), params).map_err(hook_failed)?;

        if let Some(existing) = self
            .store
            .iter()
            .find_map(|(key, other)| item.conflicts_with(other).then_some(key))
        {
            return Err(FrameworkError::Conflict(existing.to_string()));
        }

        item.on_create(ctx).await.map_err(hook_failed)?;
        self.store.insert(id.clone(), item);
        self.changed(&id);
        Ok(id)
    }

    async fn update(
        &mut self,
        id: T::Id,
        update: T::Update,
        ctx: &T::Context,
    ) -> Result<T, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(update, ctx).await.map_err(hook_failed)?;
        let updated = item.clone();
        self.changed(&id);
        Ok(updated)
    }

    async fn delete(&mut self, id: T::Id, ctx: &T::Context) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete(ctx).await.map_err(hook_failed)?;
        self.store.remove(&id);
        self.changed(&id);
        Ok(())
    }

    async fn act(
        &mut self,
        id: T::Id,
        action: T::Action,
        ctx: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let result = item.handle_action(action, ctx).await.map_err(hook_failed)?;
        if T::changed_by(&result) {
            self.changed(&id);
        }
        Ok(result)
    }

    /// Matching records in id order, with the revision they were read at.
    fn listing(&self, filter: Option<&Filter<T>>) -> Listing<T> {
        Listing {
            items: self
                .store
                .values()
                .filter(|item| filter.is_none_or(|f| f.matches(item)))
                .cloned()
                .collect(),
            revision: self.revision,
        }
    }
}

fn outcome<R>(
    entity_type: &str,
    op: &'static str,
    result: Result<R, FrameworkError>,
) -> Result<R, FrameworkError> {
    match &result {
        Ok(_) => info!(entity_type, op, "Applied"),
        Err(e) => warn!(entity_type, op, error = %e, "Rejected"),
    }
    result
}
