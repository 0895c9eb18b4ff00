//! # ActorClient Trait
//!
//! Domain clients wrap a [`ResourceClient`] and speak their own error type. Implementing
//! [`ActorClient`] gives them the read and delete operations for free, already mapped
//! through `map_error`; only the domain operations need writing by hand.
use crate::{ActorEntity, FrameworkError, Listing, ResourceClient};
use async_trait::async_trait;

/// Shared operations for domain clients.
///
/// `map_error` decides how framework failures surface. The usual shape sends
/// `NotFound` to the domain's own variant, unwraps errors raised by entity hooks, and
/// turns everything else into a communication error.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceActor, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Tag { label: String, uses: u32 }
/// #[derive(Debug)] enum TagUpdate {}
/// #[derive(Debug)] enum TagAction { Touch }
///
/// #[derive(Debug, thiserror::Error)]
/// enum TagError {
///     #[error("tag {0} not found")]
///     NotFound(String),
///     #[error("blank label")]
///     Blank,
///     #[error("tag store unavailable: {0}")]
///     Unavailable(String),
/// }
///
/// #[async_trait]
/// impl ActorEntity for Tag {
///     type Id = u32;
///     type Create = String;
///     type Update = TagUpdate;
///     type Action = TagAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = TagError;
///
///     fn from_create_params(_id: u32, label: String) -> Result<Self, TagError> {
///         if label.trim().is_empty() {
///             return Err(TagError::Blank);
///         }
///         Ok(Self { label, uses: 0 })
///     }
///     async fn on_update(&mut self, update: TagUpdate, _: &()) -> Result<(), TagError> {
///         match update {}
///     }
///     async fn handle_action(&mut self, _touch: TagAction, _: &()) -> Result<u32, TagError> {
///         self.uses += 1;
///         Ok(self.uses)
///     }
/// }
///
/// struct TagClient { inner: ResourceClient<Tag> }
///
/// #[async_trait]
/// impl ActorClient<Tag> for TagClient {
///     type Error = TagError;
///
///     fn inner(&self) -> &ResourceClient<Tag> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> TagError {
///         match e {
///             FrameworkError::NotFound(id) => TagError::NotFound(id),
///             other => other
///                 .into_entity_error::<TagError>()
///                 .unwrap_or_else(|e| TagError::Unavailable(e.to_string())),
///         }
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let mut last = 0;
///     let (actor, inner) = ResourceActor::<Tag>::new(8, move || { last += 1; last });
///     let handle = tokio::spawn(actor.run(()));
///     let tags = TagClient { inner };
///
///     let id = tags.inner().create("sale".into()).await.unwrap();
///     assert!(matches!(tags.inner().create(" ".into()).await.map_err(TagClient::map_error), Err(TagError::Blank)));
///
///     let matching = tags.find(|tag: &Tag| tag.label.starts_with('s')).await.unwrap();
///     assert_eq!(matching.items.len(), 1);
///     assert_eq!(tags.require(id).await.unwrap().label, "sale");
///
///     tags.delete(id).await.unwrap();
///     assert!(matches!(tags.require(id).await, Err(TagError::NotFound(_))));
///
///     drop(tags);
///     handle.await.unwrap();
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    type Error: Send + Sync;

    fn inner(&self) -> &ResourceClient<T>;

    fn map_error(e: FrameworkError) -> Self::Error;

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Like [`get`](Self::get), but a missing record is reported through `map_error`
    /// as [`FrameworkError::NotFound`].
    async fn require(&self, id: T::Id) -> Result<T, Self::Error> {
        let key = id.to_string();
        match self.get(id).await? {
            Some(record) => Ok(record),
            None => Err(Self::map_error(FrameworkError::NotFound(key))),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Deleting");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    async fn list(&self) -> Result<Listing<T>, Self::Error> {
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Records accepted by `predicate`, with the collection revision they were read at.
    async fn find<F>(&self, predicate: F) -> Result<Listing<T>, Self::Error>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.inner().find(predicate).await.map_err(Self::map_error)
    }
}
