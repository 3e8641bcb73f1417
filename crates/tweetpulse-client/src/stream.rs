//! Streaming endpoint support.
//!
//! The filter stream delivers newline-delimited JSON messages over a
//! long-lived chunked response, with blank keep-alive lines interleaved.
//! [`PostStream`] re-frames the byte chunks into whole messages; it yields the
//! raw line text so callers can persist messages verbatim.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};

use crate::client::PostClient;
use crate::error::ClientError;

impl PostClient {
    /// Opens the filter stream, tracking the given keywords.
    ///
    /// The connection stays open until the returned [`PostStream`] is dropped
    /// or the service disconnects. Messages are delivered sequentially; this
    /// client never invokes consumers concurrently.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RateLimited`] if the service rejects the connection
    ///   with its 420/429 markers.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Api`] on any other non-2xx status.
    pub async fn open_stream(&self, keywords: &[String]) -> Result<PostStream, ClientError> {
        let track = keywords.join(",");
        let url = self.build_url("1.1/statuses/filter.json", &[("track", track.as_str())]);

        let response = self
            .http()
            .get(url)
            .bearer_auth(self.bearer())
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        tracing::info!(track, "filter stream connected");
        Ok(PostStream::from_chunks(response.bytes_stream()))
    }
}

/// A sequential stream of raw messages from the streaming endpoint.
///
/// Each item is one message's raw serialized text (without the trailing
/// newline), or the error the connection produced at that point. Dropping the
/// stream releases the underlying connection.
pub struct PostStream {
    inner: Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>,
}

impl PostStream {
    /// Builds a stream from an in-memory message script.
    ///
    /// Intended for tests and offline simulation of stream sessions.
    #[must_use]
    pub fn from_messages(messages: Vec<Result<String, ClientError>>) -> Self {
        Self {
            inner: Box::pin(futures::stream::iter(messages)),
        }
    }

    pub(crate) fn from_chunks<S, B, E>(chunks: S) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: Into<ClientError> + Send + 'static,
    {
        Self {
            inner: Box::pin(lines_from_chunks(chunks)),
        }
    }
}

impl Stream for PostStream {
    type Item = Result<String, ClientError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Re-frames a stream of byte chunks into whole non-empty lines.
///
/// Chunk boundaries fall anywhere, including mid-message; blank keep-alive
/// lines are dropped. A non-empty trailing fragment is flushed as a final
/// message when the source ends without a newline.
fn lines_from_chunks<S, B, E>(chunks: S) -> impl Stream<Item = Result<String, ClientError>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ClientError> + Send + 'static,
{
    let state = (Box::pin(chunks), LineBuffer::default(), false);
    futures::stream::unfold(state, |(mut chunks, mut buf, mut ended)| async move {
        loop {
            if let Some(line) = buf.pop_line() {
                if line.is_empty() {
                    continue; // keep-alive newline
                }
                return Some((Ok(line), (chunks, buf, ended)));
            }
            if ended {
                return match buf.flush() {
                    Some(tail) if !tail.is_empty() => Some((Ok(tail), (chunks, buf, ended))),
                    _ => None,
                };
            }
            match chunks.next().await {
                Some(Ok(chunk)) => buf.push(chunk.as_ref()),
                Some(Err(e)) => return Some((Err(e.into()), (chunks, buf, ended))),
                None => ended = true,
            }
        }
    })
}

/// Accumulates raw bytes and hands back complete `\n`-terminated lines,
/// with any trailing `\r` stripped.
#[derive(Default)]
struct LineBuffer {
    buf: String,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) {
        self.buf.push_str(&String::from_utf8_lossy(bytes));
    }

    fn pop_line(&mut self) -> Option<String> {
        let newline = self.buf.find('\n')?;
        let rest = self.buf.split_off(newline + 1);
        let mut line = std::mem::replace(&mut self.buf, rest);
        line.truncate(newline);
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    fn flush(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }
}
