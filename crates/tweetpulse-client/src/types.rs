//! Wire types for the upstream API.
//!
//! All types model the JSON structures returned by the service's REST
//! endpoints. Timestamps arrive in the service's legacy
//! `"Wed Oct 10 20:19:24 +0000 2018"` format and are parsed into
//! [`DateTime<Utc>`] at the deserialization boundary.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single post as returned by the timeline and streaming endpoints.
///
/// When the post is a repost of another, `retweeted_status` carries the full
/// original post; the service then reports the *repost's* own `favorite_count`
/// as 0 or a small echo value, so engagement consumers must read the nested
/// object instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub id: i64,
    /// Absent on some wire variants (e.g. notices interleaved in streams).
    #[serde(default)]
    pub text: Option<String>,
    #[serde(deserialize_with = "service_date::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Client application the post was published from.
    pub source: String,
    pub retweet_count: i64,
    pub favorite_count: i64,
    /// The original post, present only when this post is a repost.
    #[serde(default)]
    pub retweeted_status: Option<Box<RawPost>>,
}

/// An account record from the `friends/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: i64,
    pub name: String,
    pub screen_name: String,
    #[serde(default)]
    pub followers_count: i64,
}

/// Wrapper for the `friends/list` response: `{ "users": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct FriendsResponse {
    pub(crate) users: Vec<RawUser>,
}

/// Token endpoint response for the credential handshake.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
}

/// Serde support for the service's legacy timestamp format.
pub(crate) mod service_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&raw, FORMAT)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
