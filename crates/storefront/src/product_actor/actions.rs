//! Custom actions for the Product actor.
//!
//! These actions are handled by
//! [`ActorEntity::handle_action`](actor_framework::ActorEntity::handle_action) on
//! [`Product`](crate::model::Product).

use crate::catalog::ReviewStats;

/// Custom actions for Product entities.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Stores a recomputed rating and review count.
    ///
    /// `revision` is the review-collection revision the stats were computed from. Stats
    /// older than the ones already stored are dropped, so a slow recompute cannot
    /// overwrite a newer one.
    ApplyReviewStats { stats: ReviewStats, revision: u64 },
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Current stock level.
    CheckStock(u32),
    /// Whether the stats were stored (`false` when they were stale).
    ApplyReviewStats(bool),
}
