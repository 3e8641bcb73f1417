//! Pipeline orchestration: batch ingestion and stream start-up.

use std::path::Path;

use tweetpulse_client::PostClient;

use crate::error::PipelineError;
use crate::record::{normalize_batch, NormalizedRecord};
use crate::session::{FileSink, SessionState, StreamSession};

/// Fetches up to `count` posts from a user's timeline and normalizes them.
///
/// One bounded request; records come back in the service's order (newest
/// first), one per post, no re-sorting and no filtering.
///
/// # Errors
///
/// Returns [`PipelineError::Client`] if the fetch fails or any response
/// element is malformed — a bad element fails the whole batch, no partial
/// records are emitted.
pub async fn fetch_and_normalize(
    client: &PostClient,
    screen_name: &str,
    count: u32,
) -> Result<Vec<NormalizedRecord>, PipelineError> {
    let posts = client.user_timeline(screen_name, count).await?;
    let records = normalize_batch(&posts);
    tracing::info!(screen_name, count = records.len(), "ingested user timeline");
    Ok(records)
}

/// Fetches up to `count` posts from the authenticated account's home timeline
/// and normalizes them.
///
/// # Errors
///
/// Same conditions as [`fetch_and_normalize`].
pub async fn fetch_home_and_normalize(
    client: &PostClient,
    count: u32,
) -> Result<Vec<NormalizedRecord>, PipelineError> {
    let posts = client.home_timeline(count).await?;
    let records = normalize_batch(&posts);
    tracing::info!(count = records.len(), "ingested home timeline");
    Ok(records)
}

/// Opens a stream session tracking `keywords`.
///
/// The caller drives it with [`StreamSession::run`] and a handler of its
/// choosing; [`stream_to_file`] is the usual pairing with the file sink.
///
/// # Errors
///
/// Returns [`PipelineError::Client`] if the connection is refused — including
/// [`tweetpulse_client::ClientError::RateLimited`] at connect time.
pub async fn start_stream(
    client: &PostClient,
    keywords: &[String],
) -> Result<StreamSession, PipelineError> {
    let messages = client.open_stream(keywords).await?;
    Ok(StreamSession::new(messages))
}

/// Streams posts matching `keywords`, appending each raw message to
/// `sink_path` until the session closes.
///
/// # Errors
///
/// Returns [`PipelineError::Client`] if the connection cannot be opened.
/// Per-message failures do not surface here; they are logged by the sink and
/// the stream continues, except for the service's rate-limit condition, which
/// closes the session.
pub async fn stream_to_file(
    client: &PostClient,
    keywords: &[String],
    sink_path: &Path,
) -> Result<SessionState, PipelineError> {
    let mut session = start_stream(client, keywords).await?;
    let mut sink = FileSink::new(sink_path);
    Ok(session.run(&mut sink).await)
}
