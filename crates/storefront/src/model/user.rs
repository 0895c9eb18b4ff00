//! Identity as reported by the external identity provider.
//!
//! The storefront never stores users itself. A [`User`] is handed to
//! [`Session::sign_in`](crate::session::Session::sign_in) after the provider has
//! authenticated it, and its id keys the user's cart and wishlist.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Users (the provider's uid).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub photo_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            display_name: display_name.into(),
            photo_url: None,
        }
    }
}
