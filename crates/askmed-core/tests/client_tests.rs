use askmed_core::{
    AskClient, AskError, FallbackCaller, QuerySession, SessionPhase, SessionUpdate,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

/// Serve exactly one HTTP response and report the request that was received.
async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: String,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        drop(listener);
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nConnection: close\r\n\r\n{body}"
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        let _ = tx.send(request);
    });

    (base_url, rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

#[tokio::test]
async fn test_session_over_http_stream() {
    let body = [
        r#"data: {"chunk": ""}"#,
        "",
        r#"data: {"chunk": "Answer part 1. "}"#,
        "",
        r#"data: {"chunk": "Related:\n1. Is Y true?"}"#,
        "",
        r#"data: {"done": true}"#,
        "",
        "",
    ]
    .join("\n");
    let (base_url, request) = serve_once("200 OK", "text/event-stream", body).await;

    let client = Arc::new(AskClient::new(base_url));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = QuerySession::new(client.clone(), client, tx);

    session.submit("What is X?").unwrap();
    session.drive().await;

    assert_eq!(session.snapshot().phase, SessionPhase::Completed);
    assert_eq!(session.snapshot().answer(), Some("Answer part 1."));
    assert_eq!(session.snapshot().follow_ups, vec!["Is Y true?"]);
    assert_eq!(session.history().len(), 1);

    let request = request.await.unwrap();
    assert!(request.starts_with("GET /api/ask?question=What%20is%20X%3F&streaming=true&_="));
    assert!(request.to_lowercase().contains("accept: text/event-stream"));

    let mut saw_history = false;
    while let Ok(update) = rx.try_recv() {
        saw_history |= matches!(update, SessionUpdate::History(_));
    }
    assert!(saw_history);
}

#[tokio::test]
async fn test_fallback_post() {
    let (base_url, request) = serve_once(
        "200 OK",
        "application/json",
        r#"{"answer": "Short answer.", "cached": true}"#.to_string(),
    )
    .await;

    let client = AskClient::new(base_url);
    let answer = client.request("What is X?").await.unwrap();
    assert_eq!(answer.answer, "Short answer.");
    assert!(answer.cached);

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /api/ask "));
    assert!(request.ends_with(r#"{"question":"What is X?","streaming":false}"#));
}

#[tokio::test]
async fn test_fallback_non_success_is_fallback_error() {
    let (base_url, _request) = serve_once(
        "500 Internal Server Error",
        "application/json",
        r#"{"error": "boom"}"#.to_string(),
    )
    .await;

    let client = AskClient::new(base_url);
    let err = client.request("q").await.unwrap_err();
    assert!(matches!(err, AskError::Fallback(_)));
}

#[tokio::test]
async fn test_stream_non_success_falls_back() {
    let (base_url, _request) = serve_once(
        "503 Service Unavailable",
        "text/plain",
        "down".to_string(),
    )
    .await;

    let client = Arc::new(AskClient::new(base_url));
    let (tx, _rx) = mpsc::unbounded_channel();
    // The fallback also targets the one-shot server, which is gone by then.
    let mut session = QuerySession::new(client.clone(), client, tx);

    session.submit("q").unwrap();
    session.drive().await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Failed);
    assert!(snapshot.result.as_ref().unwrap().error);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_health() {
    let (base_url, request) = serve_once(
        "200 OK",
        "application/json",
        r#"{"status": "ok", "message": "running", "features": ["Streaming responses"]}"#
            .to_string(),
    )
    .await;

    let health = AskClient::new(base_url).health().await.unwrap();
    assert!(health.is_ok());
    assert!(request.await.unwrap().starts_with("GET /api/health "));
}

#[tokio::test]
async fn test_server_history() {
    let (base_url, _request) = serve_once(
        "200 OK",
        "application/json",
        r#"{"history": [{"question": "q", "answer": "a", "timestamp": 1700000000.0}]}"#
            .to_string(),
    )
    .await;

    let history = AskClient::new(base_url).server_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].question, "q");
}
