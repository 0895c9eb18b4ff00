//! # Generic Client
//!
//! This module defines the generic client for communicating with actors.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Filter, Listing, ResourceRequest};
use tokio::sync::{mpsc, oneshot, watch};

/// ## ResourceClient
///
/// The `ResourceClient<T>` provides a type‑safe, async API for interacting with a `ResourceActor<T>`.
/// It forwards CRUD, Action and List requests over a Tokio mpsc channel and returns results via
/// oneshot channels.
///
/// * **Cloneable**: holds only a sender, so cloning is inexpensive.
/// * **Async API**: all methods resolve to `Result<…, FrameworkError>`.
///
/// Dropping the last client closes the channel, which ends the actor's run loop.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    /// Creates a record under a caller-chosen id. Fails with `AlreadyExists` if it is taken.
    pub async fn create_with_id(
        &self,
        id: T::Id,
        params: T::Create,
    ) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::CreateWithId {
            id,
            params,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Every record in the collection, in id order.
    pub async fn list(&self) -> Result<Listing<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List {
            filter: None,
            respond_to,
        })
        .await
    }

    /// Live view of one record. The receiver starts at the current value, is updated
    /// after every change the collection applies to it, and holds `None` once the record
    /// is deleted. Fails with `NotFound` if the record does not exist.
    pub async fn watch(&self, id: T::Id) -> Result<watch::Receiver<Option<T>>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Watch { id, respond_to })
            .await
    }

    /// Records accepted by `predicate`. The predicate runs inside the actor.
    pub async fn find(
        &self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Listing<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List {
            filter: Some(Filter::new(predicate)),
            respond_to,
        })
        .await
    }
}
