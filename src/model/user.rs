//! Signed-in user, user summaries and profile data.

use serde::{Deserialize, Serialize};

/// Opaque access token that never shows up in logs.
///
/// The inner value is hidden from `Debug` and `Display`.
/// Use `expose()` only when building auth headers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(••••••••)")
    }
}

impl std::fmt::Display for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// The signed-in user, held for the lifetime of a session.
///
/// Replaced wholesale on profile edits, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    pub access_token: AccessToken,
}

impl User {
    /// Denormalized copy used inside posts.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            profile_pic_url: self.profile_pic_url.clone(),
        }
    }
}

/// Creator / liker entry carried by a post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}

/// Profile header fields returned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}

/// Fields sent when the user edits their profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
}
