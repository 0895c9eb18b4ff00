//! # ActorEntity Trait
//!
//! A type implementing [`ActorEntity`] can be stored in a [`ResourceActor`](crate::ResourceActor).
//! The associated types pin down what each collection accepts, so a review collection only
//! takes review payloads and answers with review errors.
//!
//! Only `from_create_params`, `on_update` and `handle_action` are required. The other hooks
//! default to accepting everything.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record held in a collection actor.
///
/// Hooks run inside the actor while it holds the collection, so each one sees a
/// consistent view and nothing else writes in the meantime. They receive the `Context`
/// given to [`ResourceActor::run`](crate::ResourceActor::run), typically clients of the
/// collections this one validates against.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Key of the record. Listings are returned in `Ord` order.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug;

    type Create: Send + Sync + Debug;

    /// Field changes. Collections without editable fields use an empty enum.
    type Update: Send + Sync + Debug;

    /// Record-specific operations such as `Cancel` or `AddItem`.
    type Action: Send + Sync + Debug;

    type ActionResult: Send + Sync + Debug;

    /// Dependencies lent to every hook; `()` when there are none.
    type Context: Send + Sync;

    /// One error enum for the whole collection. Clients recover it from
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the record. Validation that needs no other collection belongs here.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Uniqueness rule. If this returns `true` against any stored record the create is
    /// rejected with [`FrameworkError::Conflict`](crate::FrameworkError::Conflict), naming
    /// that record's id. Checked in the same step as the insert.
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }

    /// Runs after `from_create_params` and the uniqueness check, before the insert.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Runs before removal; an error keeps the record.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Whether a successful action with this result modified the record. Reads and
    /// no-ops return `false` so that they neither bump the collection revision nor wake
    /// watchers.
    fn changed_by(_result: &Self::ActionResult) -> bool {
        true
    }
}
