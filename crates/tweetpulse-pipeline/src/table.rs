//! Tabular boundary output.
//!
//! The normalized-record sequence is handed to external renderers and storage
//! as rows in a fixed column order, with `sentiment` appended only once it
//! has been computed.

use crate::record::NormalizedRecord;

/// Fixed column order of the tabular boundary.
pub const COLUMNS: [&str; 7] = [
    "id",
    "text",
    "length",
    "created_at",
    "source",
    "repost_count",
    "like_count",
];

/// Header row; `sentiment` is appended when any record carries one.
#[must_use]
pub fn header(records: &[NormalizedRecord]) -> Vec<&'static str> {
    let mut columns = COLUMNS.to_vec();
    if has_sentiment(records) {
        columns.push("sentiment");
    }
    columns
}

/// One row of cell text per record, in [`COLUMNS`] order.
#[must_use]
pub fn rows(records: &[NormalizedRecord]) -> Vec<Vec<String>> {
    let with_sentiment = has_sentiment(records);
    records
        .iter()
        .map(|r| {
            let mut row = vec![
                r.id.to_string(),
                r.text.clone(),
                r.length.to_string(),
                r.created_at.to_rfc3339(),
                r.source.clone(),
                r.repost_count.to_string(),
                r.like_count.to_string(),
            ];
            if with_sentiment {
                row.push(
                    r.sentiment
                        .map(|p| p.value().to_string())
                        .unwrap_or_default(),
                );
            }
            row
        })
        .collect()
}

/// Renders header and rows as tab-separated lines for console output.
#[must_use]
pub fn render(records: &[NormalizedRecord]) -> String {
    let mut lines = vec![header(records).join("\t")];
    lines.extend(rows(records).iter().map(|row| row.join("\t")));
    lines.join("\n")
}

fn has_sentiment(records: &[NormalizedRecord]) -> bool {
    records.iter().any(|r| r.sentiment.is_some())
}
