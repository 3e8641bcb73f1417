use thiserror::Error;

use tweetpulse_client::ClientError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The upstream client failed a batch call or a stream connect.
    #[error("upstream client error: {0}")]
    Client(#[from] ClientError),

    /// The sink file could not be opened or written.
    #[error("sink I/O error: {0}")]
    Sink(#[from] std::io::Error),

    /// Summary statistics over an empty record set are undefined.
    #[error("cannot summarize an empty record set")]
    EmptyRecords,
}
