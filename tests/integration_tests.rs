//! Integration tests for gemchat.
//!
//! The HTTP tests run against a one-shot server on a loopback port, so no API
//! key or network access is needed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::{StreamExt, stream};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use gemchat::chat::{ChatConfig, ChatSession, Submission};
use gemchat::{
    Credential, FragmentStream, GenerateContentRequest, Gemini, HttpTransport, KnownModel, Model,
    PlainTextRenderer, ResponseGenerator, Role, Transport,
};

/// A request as seen by the test server.
struct Captured {
    head: String,
    body: Value,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

fn sse_body(fragments: &[&str]) -> String {
    fragments
        .iter()
        .map(|text| {
            let chunk = json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
            });
            format!("data: {chunk}\r\n\r\n")
        })
        .collect()
}

/// Answer exactly one request with `status` and `body`, returning the request.
async fn serve_once(
    status: &str,
    content_type: &str,
    response_body: String,
) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local test server");
    let addr = listener.local_addr().expect("local addr");
    let status = status.to_string();
    let content_type = content_type.to_string();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept connection");
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        let (head, body_start) = loop {
            let n = socket.read(&mut buf).await.expect("read request");
            assert!(n > 0, "client closed before sending headers");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break (String::from_utf8_lossy(&raw[..pos]).to_string(), pos + 4);
            }
        };
        let length: usize = head
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while raw.len() < body_start + length {
            let n = socket.read(&mut buf).await.expect("read body");
            assert!(n > 0, "client closed before sending body");
            raw.extend_from_slice(&buf[..n]);
        }
        let body = serde_json::from_slice(&raw[body_start..body_start + length])
            .expect("request body is JSON");

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
            response_body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        Captured { head, body }
    });

    (format!("http://{addr}/v1beta/"), server)
}

fn credential() -> Credential {
    Credential::new("test-key").unwrap()
}

fn pro() -> Model {
    Model::Known(KnownModel::Gemini25Pro)
}

#[tokio::test]
async fn streams_chunks_from_server() {
    let (base_url, server) =
        serve_once("200 OK", "text/event-stream", sse_body(&["Hello", ", world"])).await;

    let client = Gemini::with_options(Some(credential()), Some(base_url), None).unwrap();
    let request = ResponseGenerator::new(pro()).request_for("What is 2+2?");
    let stream = client.stream_generate_content(&pro(), &request).await.unwrap();
    let texts: Vec<String> = stream.map(|chunk| chunk.unwrap().text()).collect().await;
    assert_eq!(texts, vec!["Hello".to_string(), ", world".to_string()]);

    let captured = server.await.unwrap();
    assert_eq!(
        captured.request_line(),
        "POST /v1beta/models/gemini-2.5-pro:streamGenerateContent?alt=sse HTTP/1.1"
    );
    assert_eq!(captured.header("x-goog-api-key").as_deref(), Some("test-key"));
    assert_eq!(
        captured.body,
        json!({
            "contents": [{"role": "user", "parts": [{"text": "What is 2+2?"}]}],
            "tools": [{"googleSearch": {}}],
            "generationConfig": {
                "thinkingConfig": {"thinkingBudget": -1},
                "responseMimeType": "text/plain"
            }
        })
    );
}

#[tokio::test]
async fn error_status_is_upstream() {
    let body = json!({
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT"
        }
    })
    .to_string();
    let (base_url, server) = serve_once("400 Bad Request", "application/json", body).await;

    let generator = ResponseGenerator::with_transport(
        HttpTransport::new().with_base_url(Some(base_url)),
        pro(),
    );
    let err = generator.generate("hi", Some("bad-key")).await.unwrap_err();
    assert!(err.is_upstream());
    assert_eq!(err.status_code(), Some(400));
    assert!(err.message().contains("API key not valid"));
    server.await.unwrap();
}

#[tokio::test]
async fn generator_assembles_reply_over_http() {
    let (base_url, server) = serve_once("200 OK", "text/event-stream", sse_body(&["4", ""])).await;

    let generator = ResponseGenerator::with_transport(
        HttpTransport::new().with_base_url(Some(base_url)),
        pro(),
    );
    let reply = generator.generate("What is 2+2?", Some("k")).await.unwrap();
    assert_eq!(reply, "4");

    let captured = server.await.unwrap();
    assert_eq!(captured.body["contents"][0]["parts"][0]["text"], "What is 2+2?");
}

#[tokio::test]
async fn missing_credential_makes_no_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v1beta/", listener.local_addr().unwrap());
    let generator = ResponseGenerator::with_transport(
        HttpTransport::new().with_base_url(Some(base_url)),
        pro(),
    );

    let err = generator.generate("hi", None).await.unwrap_err();
    assert!(err.is_configuration());
    let err = generator.generate("hi", Some("")).await.unwrap_err();
    assert!(err.is_configuration());

    let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
    assert!(accepted.is_err(), "no connection should have been attempted");
}

#[tokio::test]
async fn unreachable_endpoint_is_upstream() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v1beta/", listener.local_addr().unwrap());
    drop(listener);

    let generator = ResponseGenerator::with_transport(
        HttpTransport::new()
            .with_base_url(Some(base_url))
            .with_timeout(Some(Duration::from_secs(5))),
        pro(),
    );
    let err = generator.generate("hi", Some("k")).await.unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn session_over_http() {
    let (base_url, server) =
        serve_once("200 OK", "text/event-stream", sse_body(&["Hi ", "there!"])).await;
    let config = ChatConfig::new().with_base_url(base_url).without_color();
    let mut session = ChatSession::with_generator(config.generator(), Some(credential()));
    let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);

    let outcome = session.submit("hello", &mut renderer).await.unwrap();
    assert!(matches!(outcome, Submission::Answered));
    let messages = session.transcript().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content(), "Hi there!");
    server.await.unwrap();
}

#[tokio::test]
async fn session_records_http_failure() {
    let body = json!({
        "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
    })
    .to_string();
    let (base_url, server) =
        serve_once("503 Service Unavailable", "application/json", body).await;
    let config = ChatConfig::new().with_base_url(base_url);
    let mut session = ChatSession::with_generator(config.generator(), Some(credential()));
    let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);

    let outcome = session.submit("hello", &mut renderer).await.unwrap();
    assert!(matches!(outcome, Submission::Failed(_)));
    let last = session.transcript().last().unwrap();
    assert_eq!(last.role(), Role::Assistant);
    assert!(last.is_error());
    assert!(last.content().contains("overloaded"));
    server.await.unwrap();
}

/// Replies with a fixed text and counts calls.
struct Canned {
    reply: &'static str,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Transport for Canned {
    async fn open(
        &self,
        _credential: &Credential,
        _model: &Model,
        _request: GenerateContentRequest,
    ) -> gemchat::Result<FragmentStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Box::pin(stream::iter(vec![Ok(self.reply.to_string())])))
    }
}

#[tokio::test]
async fn hi_then_bye_fills_transcript() {
    let transport = Canned {
        reply: "Goodbye!",
        calls: AtomicUsize::new(0),
    };
    let generator = ResponseGenerator::with_transport(transport, pro());
    let mut session = ChatSession::with_generator(generator, Some(credential()));
    let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);

    session.submit("hi", &mut renderer).await.unwrap();
    session.submit("bye", &mut renderer).await.unwrap();

    let stats = session.stats();
    assert_eq!((stats.total, stats.user, stats.assistant), (4, 2, 2));
    assert_eq!(session.generator().transport().calls.load(Ordering::SeqCst), 2);

    session.clear();
    assert_eq!(session.stats().total, 0);
}

#[tokio::test]
async fn session_without_credential_never_calls() {
    let transport = Canned {
        reply: "unused",
        calls: AtomicUsize::new(0),
    };
    let generator = ResponseGenerator::with_transport(transport, pro());
    let mut session = ChatSession::with_generator(generator, None);
    let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);

    let err = session.submit("hi", &mut renderer).await.unwrap_err();
    assert!(err.is_configuration());
    assert!(session.transcript().is_empty());
    assert_eq!(session.generator().transport().calls.load(Ordering::SeqCst), 0);
}
