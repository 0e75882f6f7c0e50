use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::DEFAULT_MAX_REQUEST_BYTES;
use crate::http::parser::{parse_request_line, ParseError};
use crate::http::request::RequestLine;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// A failure contained to one connection. The server keeps accepting.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("receive failed: {0}")]
    Receive(#[source] std::io::Error),

    #[error("send failed: {0}")]
    Transmit(#[source] std::io::Error),
}

/// How a connection ended when nothing went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exactly one response was sent.
    Responded(StatusCode),
    /// The peer closed before sending a single byte.
    NoRequest,
}

pub struct Connection<S> {
    stream: S,
    buffer: Vec<u8>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Result<RequestLine, ParseError>),
    Writing(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self::with_buffer_size(stream, DEFAULT_MAX_REQUEST_BYTES)
    }

    /// `buffer_size` counts a reserved terminator slot, so at most
    /// `buffer_size - 1` bytes are read.
    pub fn with_buffer_size(stream: S, buffer_size: usize) -> Self {
        Self {
            stream,
            buffer: vec![0u8; buffer_size.saturating_sub(1).max(1)],
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection to completion and closes it.
    ///
    /// Takes `self` by value so the stream is dropped, and therefore closed,
    /// exactly once on every path out of this function.
    pub async fn run(mut self) -> Result<Outcome, ConnectionError> {
        let mut outcome = Outcome::NoRequest;

        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_chunk().await? {
                    Some(n) => {
                        let parsed = parse_request_line(&self.buffer[..n]);
                        self.state = ConnectionState::Processing(parsed);
                    }
                    None => {
                        self.state = ConnectionState::Closed;
                    }
                },

                ConnectionState::Processing(parsed) => {
                    self.state = ConnectionState::Writing(decide_response(&parsed));
                }

                ConnectionState::Writing(response) => {
                    ResponseWriter::new(&response)
                        .write_to_stream(&mut self.stream)
                        .await
                        .map_err(ConnectionError::Transmit)?;

                    outcome = Outcome::Responded(response.status);
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "shutdown after response failed");
        }

        Ok(outcome)
    }

    /// Reads the first chunk the peer sends. Later bytes are never read, so a
    /// request line split across two segments is parsed from the first part.
    async fn read_chunk(&mut self) -> Result<Option<usize>, ConnectionError> {
        loop {
            match self.stream.read(&mut self.buffer).await {
                Ok(0) => return Ok(None),
                Ok(n) => return Ok(Some(n)),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ConnectionError::Receive(e)),
            }
        }
    }
}

/// Picks the response for a parsed (or unparseable) request line.
///
/// Checks run in order: token count, then method, then target.
pub fn decide_response(parsed: &Result<RequestLine, ParseError>) -> Response {
    let line = match parsed {
        Ok(line) => line,
        Err(ParseError::MalformedRequestLine) => {
            tracing::warn!("malformed request line");
            return Response::bad_request();
        }
    };

    tracing::debug!(method = %line.method, target = %line.target, "parsed request line");

    if !line.is_get() {
        return Response::method_not_allowed();
    }

    if !line.is_root() {
        return Response::not_found();
    }

    Response::ok()
}
