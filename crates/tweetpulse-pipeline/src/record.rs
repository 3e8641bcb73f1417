//! Normalization of wire posts into the pipeline's uniform row schema.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tweetpulse_client::RawPost;

use crate::sentiment::{Polarity, PolarityScorer, SentimentClassifier};

/// One post in the pipeline's uniform schema.
///
/// Constructed once per wire post during ingestion; immutable afterwards
/// except for the lazy attachment of `sentiment`.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedRecord {
    pub id: i64,
    /// Original, uncleaned text. Empty when the wire variant carries none.
    pub text: String,
    /// Character count of `text`.
    pub length: usize,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub repost_count: i64,
    /// For reposts this is the *original* post's like count; the repost's own
    /// counter is an echo the service zeroes or truncates.
    pub like_count: i64,
    /// Attached by [`attach_sentiment`]; `None` until then.
    pub sentiment: Option<Polarity>,
}

/// Converts one wire post into a [`NormalizedRecord`].
///
/// Total over well-formed wire posts. Missing text normalizes to the empty
/// string with `length == 0`.
#[must_use]
pub fn normalize(raw: &RawPost) -> NormalizedRecord {
    let text = raw.text.clone().unwrap_or_default();
    let like_count = match &raw.retweeted_status {
        Some(original) => original.favorite_count,
        None => raw.favorite_count,
    };

    NormalizedRecord {
        id: raw.id,
        length: text.chars().count(),
        created_at: raw.created_at,
        source: raw.source.clone(),
        repost_count: raw.retweet_count,
        like_count,
        text,
        sentiment: None,
    }
}

/// Normalizes a batch of wire posts, preserving order — one output per input,
/// no filtering.
#[must_use]
pub fn normalize_batch(raws: &[RawPost]) -> Vec<NormalizedRecord> {
    raws.iter().map(normalize).collect()
}

/// Computes and attaches a sentiment label to every record.
pub fn attach_sentiment<S: PolarityScorer>(
    records: &mut [NormalizedRecord],
    classifier: &SentimentClassifier<S>,
) {
    for record in records {
        record.sentiment = Some(classifier.classify(&record.text));
    }
}
