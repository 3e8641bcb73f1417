//! HTTP client for the upstream timeline and streaming API.
//!
//! Wraps `reqwest` with the service's credential handshake, typed response
//! deserialization, and rate-limit detection. Batch endpoints return fully
//! parsed post/user lists; the streaming endpoint yields raw newline-delimited
//! JSON messages so callers can persist them verbatim.

mod client;
mod error;
mod stream;
mod types;

pub use client::PostClient;
pub use error::ClientError;
pub use stream::PostStream;
pub use types::{RawPost, RawUser};
