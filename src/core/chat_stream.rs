use std::error::Error as StdError;
use std::fmt;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::QuestionRequest;
use crate::core::conversation::TurnId;
use crate::utils::utf8_stream::{Utf8StreamDecoder, Utf8StreamError};

/// Anything that went wrong while issuing the request or reading its body.
/// The variants only matter for diagnostics; the conversation treats them
/// all the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamFailure {
    /// The request could not be sent (connection refused, DNS, TLS, ...).
    Request(String),
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
    /// The connection broke while the body was being read.
    Body(String),
    /// The body was not valid UTF-8.
    Decode(Utf8StreamError),
}

impl fmt::Display for StreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamFailure::Request(err) => write!(f, "request failed: {err}"),
            StreamFailure::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "backend returned status {status}")
                } else {
                    write!(f, "backend returned status {status}: {body}")
                }
            }
            StreamFailure::Body(err) => write!(f, "response stream failed: {err}"),
            StreamFailure::Decode(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for StreamFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StreamFailure::Decode(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    Chunk(String),
    Error(StreamFailure),
    End,
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub endpoint: String,
    pub question: String,
    pub turn: TurnId,
}

/// Runs one background task per turn and reports its progress over a
/// channel tagged with the turn id.
#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, TurnId)>,
    shutdown: CancellationToken,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, TurnId)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                shutdown: CancellationToken::new(),
            },
            rx,
        )
    }

    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let turn = params.turn;
            tokio::select! {
                _ = stream_answer(params, &tx) => {}
                _ = shutdown.cancelled() => {
                    debug!(%turn, "stream task dropped during shutdown");
                }
            }
        });
    }

    /// Stops every in-flight stream task. Used when the application exits.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, turn: TurnId) {
        let _ = self.tx.send((message, turn));
    }
}

async fn stream_answer(params: StreamParams, tx: &mpsc::UnboundedSender<(StreamMessage, TurnId)>) {
    let StreamParams {
        client,
        endpoint,
        question,
        turn,
    } = params;

    debug!(%turn, endpoint = %endpoint, "sending question");
    let result = read_answer(&client, &endpoint, &question, |fragment| {
        let _ = tx.send((StreamMessage::Chunk(fragment), turn));
    })
    .await;

    match result {
        Ok(bytes) => debug!(%turn, bytes, "response stream finished"),
        Err(failure) => {
            let _ = tx.send((StreamMessage::Error(failure), turn));
        }
    }
    let _ = tx.send((StreamMessage::End, turn));
}

/// Posts the question and hands every decoded fragment to `on_fragment` in
/// arrival order. Returns the number of body bytes read.
pub async fn read_answer(
    client: &reqwest::Client,
    endpoint: &str,
    question: &str,
    mut on_fragment: impl FnMut(String),
) -> Result<usize, StreamFailure> {
    let response = client
        .post(endpoint)
        .header("Content-Type", "application/json")
        .json(&QuestionRequest::new(question))
        .send()
        .await
        .map_err(|err| StreamFailure::Request(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(StreamFailure::Status {
            status: status.as_u16(),
            body,
        });
    }

    let mut stream = response.bytes_stream();
    let mut decoder = Utf8StreamDecoder::new();
    let mut received = 0usize;

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| StreamFailure::Body(err.to_string()))?;
        received += bytes.len();
        let fragment = decoder.decode(&bytes).map_err(StreamFailure::Decode)?;
        if !fragment.is_empty() {
            on_fragment(fragment);
        }
    }

    decoder.finish().map_err(StreamFailure::Decode)?;
    Ok(received)
}
