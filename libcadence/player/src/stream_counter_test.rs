use assert_matches::assert_matches;
use rstest::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::*;

/// Serves a single canned JSON response and reports the request line it received.
async fn serve_once(body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_owned();

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        tx.send(request_line).ok();
    });

    (format!("http://{addr}"), rx)
}

#[rstest]
#[tokio::test]
async fn test_increment_posts_track_id() {
    let (endpoint, request_rx) = serve_once(r#"{"success": true}"#).await;
    let counter = HttpStreamCounter::new(format!("{endpoint}/"));

    counter.increment("42").await.unwrap();

    assert_eq!("POST /stream/42 HTTP/1.1", request_rx.await.unwrap());
}

#[rstest]
#[tokio::test]
async fn test_increment_rejected() {
    let (endpoint, _request_rx) =
        serve_once(r#"{"success": false, "error": "Song not found"}"#).await;
    let counter = HttpStreamCounter::new(endpoint);

    assert_matches!(
        counter.increment("missing").await,
        Err(StreamCountError::Rejected(msg)) if msg == "Song not found"
    );
}

#[rstest]
#[tokio::test]
async fn test_increment_invalid_body() {
    let (endpoint, _request_rx) = serve_once("not json").await;
    let counter = HttpStreamCounter::new(endpoint);

    assert_matches!(
        counter.increment("1").await,
        Err(StreamCountError::InvalidResponse(_))
    );
}
