//! Stream sessions.
//!
//! A session consumes one connection's messages sequentially and hands each
//! one to a [`StreamHandler`]. Handlers are plain capability objects, not
//! subclasses of anything: `on_message`/`on_error` return whether the session
//! should stay open. The one hard rule: a rate-limit condition closes the
//! session (and only the session — the process carries on).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use futures::StreamExt;

use tweetpulse_client::{ClientError, PostStream};

/// Lifecycle of a stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Error condition delivered to [`StreamHandler::on_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamErrorCode {
    /// The service's rate-limit markers (HTTP 420/429).
    RateLimited,
    /// A message that could not be decoded.
    Malformed,
    /// Any other connection-level failure.
    Transport,
}

impl From<&ClientError> for StreamErrorCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::RateLimited { .. } => StreamErrorCode::RateLimited,
            ClientError::Deserialize { .. } => StreamErrorCode::Malformed,
            _ => StreamErrorCode::Transport,
        }
    }
}

/// Capability interface for stream consumers.
///
/// Both callbacks return `true` to keep the session open, `false` to close it.
/// Callbacks are invoked sequentially, never concurrently.
pub trait StreamHandler {
    fn on_message(&mut self, raw: &str) -> bool;
    fn on_error(&mut self, code: StreamErrorCode) -> bool;
}

/// Production handler: appends each raw message to a file.
///
/// The file handle is acquired per append and closed when it drops, so a
/// crash between messages never holds the sink open. The file is only ever
/// appended to, never truncated. Write failures are logged and swallowed —
/// one bad write must not end the session.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, raw: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(raw.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}

impl StreamHandler for FileSink {
    fn on_message(&mut self, raw: &str) -> bool {
        if let Err(err) = self.append(raw) {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to append streamed message — continuing"
            );
        }
        true
    }

    fn on_error(&mut self, code: StreamErrorCode) -> bool {
        match code {
            StreamErrorCode::RateLimited => {
                tracing::warn!("streaming rate limit reached — closing session");
                false
            }
            StreamErrorCode::Malformed | StreamErrorCode::Transport => {
                tracing::warn!(?code, "stream error — continuing");
                true
            }
        }
    }
}

/// One open connection to the streaming service.
///
/// Owns its message stream exclusively; dropping the session releases the
/// connection. There is no shared state across sessions.
pub struct StreamSession {
    messages: PostStream,
    state: SessionState,
}

impl StreamSession {
    #[must_use]
    pub fn new(messages: PostStream) -> Self {
        Self {
            messages,
            state: SessionState::Open,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Explicit shutdown. [`StreamSession::run`] stops before touching the
    /// next message.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Drives the session until it closes or the connection ends.
    ///
    /// Messages are handled inline, one at a time, on this task — handlers
    /// are never invoked reentrantly. A rate-limit error closes the session
    /// through the handler's `on_error`; other errors continue at the
    /// handler's discretion.
    pub async fn run<H: StreamHandler>(&mut self, handler: &mut H) -> SessionState {
        while self.state == SessionState::Open {
            match self.messages.next().await {
                Some(Ok(raw)) => {
                    if !handler.on_message(&raw) {
                        self.state = SessionState::Closed;
                    }
                }
                Some(Err(err)) => {
                    tracing::debug!(error = %err, "stream delivered an error");
                    if !handler.on_error(StreamErrorCode::from(&err)) {
                        self.state = SessionState::Closed;
                    }
                }
                None => {
                    tracing::info!("stream ended — closing session");
                    self.state = SessionState::Closed;
                }
            }
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_sink(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tweetpulse-session-{}-{name}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn messages(items: Vec<Result<&str, ClientError>>) -> PostStream {
        PostStream::from_messages(
            items
                .into_iter()
                .map(|item| item.map(str::to_string))
                .collect(),
        )
    }

    fn malformed() -> ClientError {
        let source = serde_json::from_str::<()>("not json").unwrap_err();
        ClientError::Deserialize {
            context: "stream message".to_string(),
            source,
        }
    }

    #[tokio::test]
    async fn rate_limit_closes_session_and_stops_writes() {
        let sink_path = temp_sink("rate-limit");
        let mut sink = FileSink::new(&sink_path);
        let mut session = StreamSession::new(messages(vec![
            Ok("{\"id\":1}"),
            Err(ClientError::RateLimited { status: 420 }),
            Ok("{\"id\":2}"),
        ]));

        let state = session.run(&mut sink).await;
        assert_eq!(state, SessionState::Closed);

        let contents = std::fs::read_to_string(&sink_path).unwrap();
        assert!(contents.contains("{\"id\":1}"));
        assert!(
            !contents.contains("{\"id\":2}"),
            "no writes may happen after the session closes"
        );
        let _ = std::fs::remove_file(&sink_path);
    }

    #[tokio::test]
    async fn malformed_message_does_not_close_session() {
        let sink_path = temp_sink("malformed");
        let mut sink = FileSink::new(&sink_path);
        let mut session = StreamSession::new(messages(vec![
            Ok("{\"id\":1}"),
            Err(malformed()),
            Ok("{\"id\":2}"),
        ]));

        session.run(&mut sink).await;

        let contents = std::fs::read_to_string(&sink_path).unwrap();
        assert!(
            contents.contains("{\"id\":1}") && contents.contains("{\"id\":2}"),
            "the next valid message must still be appended: {contents}"
        );
        let _ = std::fs::remove_file(&sink_path);
    }

    #[tokio::test]
    async fn exhausted_stream_leaves_session_closed() {
        let sink_path = temp_sink("exhausted");
        let mut sink = FileSink::new(&sink_path);
        let mut session = StreamSession::new(messages(vec![Ok("{\"id\":1}")]));

        assert_eq!(session.state(), SessionState::Open);
        let state = session.run(&mut sink).await;
        assert_eq!(state, SessionState::Closed);
        let _ = std::fs::remove_file(&sink_path);
    }

    #[tokio::test]
    async fn explicit_close_stops_run_before_any_message() {
        struct CountingHandler {
            seen: usize,
        }
        impl StreamHandler for CountingHandler {
            fn on_message(&mut self, _raw: &str) -> bool {
                self.seen += 1;
                true
            }
            fn on_error(&mut self, _code: StreamErrorCode) -> bool {
                true
            }
        }

        let mut handler = CountingHandler { seen: 0 };
        let mut session = StreamSession::new(messages(vec![Ok("{\"id\":1}")]));
        session.close();
        let state = session.run(&mut handler).await;
        assert_eq!(state, SessionState::Closed);
        assert_eq!(handler.seen, 0);
    }

    #[tokio::test]
    async fn handler_can_close_session_from_on_message() {
        struct OneShotHandler {
            seen: usize,
        }
        impl StreamHandler for OneShotHandler {
            fn on_message(&mut self, _raw: &str) -> bool {
                self.seen += 1;
                false
            }
            fn on_error(&mut self, _code: StreamErrorCode) -> bool {
                true
            }
        }

        let mut handler = OneShotHandler { seen: 0 };
        let mut session = StreamSession::new(messages(vec![Ok("a"), Ok("b"), Ok("c")]));
        session.run(&mut handler).await;
        assert_eq!(handler.seen, 1, "session must close after the first refusal");
    }

    #[tokio::test]
    async fn appends_never_truncate_existing_content() {
        let sink_path = temp_sink("append-only");
        std::fs::write(&sink_path, "pre-existing\n").unwrap();

        let mut sink = FileSink::new(&sink_path);
        let mut session = StreamSession::new(messages(vec![Ok("{\"id\":1}")]));
        session.run(&mut sink).await;

        let contents = std::fs::read_to_string(&sink_path).unwrap();
        assert!(contents.starts_with("pre-existing\n"));
        assert!(contents.contains("{\"id\":1}"));
        let _ = std::fs::remove_file(&sink_path);
    }

    #[test]
    fn error_codes_map_from_client_errors() {
        assert_eq!(
            StreamErrorCode::from(&ClientError::RateLimited { status: 429 }),
            StreamErrorCode::RateLimited
        );
        assert_eq!(
            StreamErrorCode::from(&malformed()),
            StreamErrorCode::Malformed
        );
        assert_eq!(
            StreamErrorCode::from(&ClientError::Api {
                status: 503,
                message: "over capacity".to_string()
            }),
            StreamErrorCode::Transport
        );
    }
}
