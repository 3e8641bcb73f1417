//! Aggregate statistics over a finite record sequence.

use crate::error::PipelineError;
use crate::record::NormalizedRecord;

/// Aggregates computed over one ingested batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub mean_length: f64,
    pub max_likes: i64,
    pub max_reposts: i64,
}

/// Computes summary statistics over `records`.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyRecords`] for an empty input — the mean of
/// nothing is an error here, never NaN or 0.
pub fn summarize(records: &[NormalizedRecord]) -> Result<Summary, PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::EmptyRecords);
    }

    #[allow(clippy::cast_precision_loss)]
    let mean_length =
        records.iter().map(|r| r.length as f64).sum::<f64>() / records.len() as f64;
    let max_likes = records.iter().map(|r| r.like_count).max().unwrap_or(0);
    let max_reposts = records.iter().map(|r| r.repost_count).max().unwrap_or(0);

    Ok(Summary {
        mean_length,
        max_likes,
        max_reposts,
    })
}
