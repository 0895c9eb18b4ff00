//! # Generic Messages
//!
//! This module defines the message types exchanged between a `ResourceClient` and its
//! `ResourceActor`, together with the [`Listing`] snapshot returned by queries.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use std::fmt;
use tokio::sync::{oneshot, watch};

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A predicate evaluated inside the actor against every stored entity.
pub struct Filter<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// Snapshot of (part of) a collection.
///
/// `revision` counts the successful mutations the collection had applied when the snapshot
/// was taken. Two listings of the same collection with the same revision hold the same data.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub revision: u64,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            revision: 0,
        }
    }
}

/// Internal message type sent to the actor to request operations.
///
/// # The CRUD Pattern
/// The variants map to document-store operations, plus a custom `Action` variant for
/// record-specific logic that doesn't fit CRUD:
///
/// - **Create**: server-assigned id, uses [`ActorEntity::Create`].
/// - **CreateWithId**: caller-supplied id (e.g. a cart keyed by its owner).
/// - **Get**: fetch one record by id.
/// - **Update**: partial update with [`ActorEntity::Update`].
/// - **Delete**: remove one record.
/// - **Action**: run an [`ActorEntity::Action`] against one record.
/// - **List**: snapshot of every record matching an optional [`Filter`], in id order.
/// - **Watch**: subscription to one record; the receiver sees every later change and
///   `None` once the record is deleted.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    CreateWithId {
        id: T::Id,
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    List {
        filter: Option<Filter<T>>,
        respond_to: Response<Listing<T>>,
    },
    Watch {
        id: T::Id,
        respond_to: Response<watch::Receiver<Option<T>>>,
    },
}
