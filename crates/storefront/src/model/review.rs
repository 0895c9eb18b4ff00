//! Product reviews.
//!
//! A user may review a product once, and only after ordering it. Both rules live in the
//! review collection (see [`crate::review_actor`]), not in callers.

use crate::model::{ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const MAX_REVIEW_PHOTOS: usize = 3;

/// Type-safe identifier for Reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub u32);

impl From<u32> for ReviewId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "review_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_photo: Option<String>,
    /// 1 to 5.
    pub rating: u8,
    pub comment: String,
    pub photos: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(id: ReviewId, params: ReviewCreate) -> Self {
        let now = Utc::now();
        Self {
            id,
            product_id: params.product_id,
            user_id: params.user_id,
            user_name: params.user_name,
            user_photo: params.user_photo,
            rating: params.rating,
            comment: params.comment,
            photos: params.photos,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewCreate {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_photo: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub photos: Option<Vec<String>>,
}
