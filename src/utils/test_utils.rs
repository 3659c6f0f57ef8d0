#[cfg(test)]
use crate::core::conversation::{Conversation, ConversationView, TurnId};
#[cfg(test)]
use crate::core::session::ChatSession;
#[cfg(test)]
use crate::utils::logging::LoggingState;
#[cfg(test)]
use std::time::Duration;
#[cfg(test)]
use tokio::io::{AsyncReadExt, AsyncWriteExt};
#[cfg(test)]
use tokio::net::TcpListener;
#[cfg(test)]
use tokio::sync::oneshot;

#[cfg(test)]
pub fn turn_id(value: u64) -> TurnId {
    TurnId::from_raw(value)
}

#[cfg(test)]
pub fn create_test_session() -> ChatSession {
    ChatSession::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9/chat/".to_string(),
        LoggingState::new(None),
    )
}

/// Records every post-mutation hook call together with the text of the last
/// message at that moment.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingView {
    pub calls: usize,
    pub last_texts: Vec<String>,
    pub lengths: Vec<usize>,
}

#[cfg(test)]
impl ConversationView for RecordingView {
    fn scroll_to_latest(&mut self, conversation: &Conversation) {
        self.calls += 1;
        self.lengths.push(conversation.len());
        self.last_texts.push(
            conversation
                .last()
                .map(|message| message.text.clone())
                .unwrap_or_default(),
        );
    }
}

#[cfg(test)]
pub struct FixtureResponse {
    status: u16,
    chunks: Vec<Vec<u8>>,
    terminate: bool,
}

#[cfg(test)]
impl FixtureResponse {
    /// A chunked response that writes each element as its own chunk.
    pub fn chunked(status: u16, chunks: Vec<Vec<u8>>) -> Self {
        Self {
            status,
            chunks,
            terminate: true,
        }
    }

    /// A 200 response whose connection closes before the final chunk.
    pub fn truncated(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            status: 200,
            chunks,
            terminate: false,
        }
    }
}

#[cfg(test)]
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[cfg(test)]
impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }
}

#[cfg(test)]
pub struct HttpFixture {
    addr: std::net::SocketAddr,
    captured: oneshot::Receiver<CapturedRequest>,
}

#[cfg(test)]
impl HttpFixture {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn request(self) -> CapturedRequest {
        self.captured.await.expect("fixture captured a request")
    }
}

/// Serves exactly one HTTP request on a local port.
#[cfg(test)]
pub async fn spawn_http_fixture(response: FixtureResponse) -> HttpFixture {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let (captured_tx, captured_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let request = read_http_request(&mut stream).await;
        let _ = captured_tx.send(request);

        let reason = if response.status == 200 { "OK" } else { "Error" };
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: text/plain; charset=utf-8\r\nTransfer-Encoding: chunked\r\n\r\n",
            response.status, reason
        );
        stream.write_all(head.as_bytes()).await.expect("write head");

        for chunk in &response.chunks {
            stream
                .write_all(format!("{:x}\r\n", chunk.len()).as_bytes())
                .await
                .expect("write chunk size");
            stream.write_all(chunk).await.expect("write chunk");
            stream.write_all(b"\r\n").await.expect("write chunk end");
            stream.flush().await.expect("flush chunk");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        if response.terminate {
            stream.write_all(b"0\r\n\r\n").await.expect("write terminator");
            stream.flush().await.expect("flush terminator");
        }
        let _ = stream.shutdown().await;
    });

    HttpFixture {
        addr,
        captured: captured_rx,
    }
}

#[cfg(test)]
async fn read_http_request(stream: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let read = stream.read(&mut chunk).await.expect("read request");
        assert!(read > 0, "connection closed before headers were complete");
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk).await.expect("read body");
        assert!(read > 0, "connection closed before body was complete");
        body.extend_from_slice(&chunk[..read]);
    }

    CapturedRequest {
        request_line,
        headers,
        body,
    }
}
