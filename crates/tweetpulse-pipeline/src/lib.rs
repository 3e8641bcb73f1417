//! Ingestion-and-normalization pipeline for tweetpulse.
//!
//! Fetches posts from the upstream API (batch or streaming), cleans text,
//! classifies sentiment, and normalizes heterogeneous post records into a
//! uniform row schema. The one substantive normalization rule: a repost's
//! like count lives on the nested original post, not on the repost itself.

pub mod clean;
pub mod error;
pub mod ingest;
pub mod record;
pub mod sentiment;
pub mod session;
pub mod summary;
pub mod table;

pub use clean::clean;
pub use error::PipelineError;
pub use ingest::{fetch_and_normalize, fetch_home_and_normalize, start_stream, stream_to_file};
pub use record::{attach_sentiment, normalize, normalize_batch, NormalizedRecord};
pub use sentiment::{LexiconScorer, Polarity, PolarityScorer, SentimentClassifier};
pub use session::{FileSink, SessionState, StreamErrorCode, StreamHandler, StreamSession};
pub use summary::{summarize, Summary};
