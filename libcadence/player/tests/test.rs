use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use libcadence_player::MockOutput;
use libcadence_player::cadence_player::*;
use pretty_assertions::assert_eq;
use rstest::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;

#[ctor::ctor]
fn init() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .try_init()
        .ok();
}

/// Accepts connections until the test ends, answering every stream count request with success
/// and forwarding the request line.
async fn stream_service() -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut buf = vec![0; 4096];
                let n = socket.read(&mut buf).await.unwrap_or_default();
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let body = r#"{"success": true}"#;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.ok();
                socket.shutdown().await.ok();
                tx.send(request.lines().next().unwrap_or_default().to_owned())
                    .ok();
            });
        }
    });

    (format!("http://{addr}"), rx)
}

fn track(id: &str) -> Track {
    let attributes = HashMap::from([
        ("id".to_owned(), id.to_owned()),
        ("title".to_owned(), format!("Song {id}")),
        ("artist".to_owned(), "Artist".to_owned()),
        (
            "url".to_owned(),
            format!("https://cdn.example.com/audios/{id}.mp3"),
        ),
        (
            "cover".to_owned(),
            format!("https://cdn.example.com/covers/{id}.jpg"),
        ),
    ]);
    Track::from_attributes(&attributes).unwrap()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn test_session_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (endpoint, mut requests) = stream_service().await;
    let settings = Settings {
        stream_endpoint: endpoint,
        ..Settings::default()
    };

    let output = MockOutput::new();
    let player = CadencePlayer::new(
        output.clone(),
        FileStorage::new_from_path(dir.path()).unwrap(),
        Arc::new(HttpStreamCounter::new(settings.stream_endpoint.clone())),
        settings.clone(),
    );
    for id in ["1", "2", "3"] {
        player.add_to_queue(track(id)).await.unwrap();
    }
    player.play_from_queue(1).await.unwrap();
    player.cycle_repeat().await.unwrap();
    player.toggle_mute().await.unwrap();

    let request = timeout(Duration::from_secs(10), requests.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!("POST /stream/2 HTTP/1.1", request);
    assert_eq!(0.0, output.volume());
    player.join().await.unwrap();

    let output = MockOutput::new();
    let player = CadencePlayer::new(
        output.clone(),
        FileStorage::new_from_path(dir.path()).unwrap(),
        Arc::new(HttpStreamCounter::new(settings.stream_endpoint.clone())),
        settings,
    );
    let status = player.get_current_status().await.unwrap();

    assert_eq!(vec![track("1"), track("2"), track("3")], status.queue);
    assert_eq!(Some(1), status.current_index);
    assert_eq!(RepeatMode::All, status.repeat_mode);
    assert!(status.is_muted);
    assert!(!status.is_playing);
    assert_eq!(0, status.effective_volume());
    assert_eq!(Some(track("2").audio_url), output.source());
    assert!(output.paused());
    player.join().await.unwrap();
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_stream_service_does_not_block_playback() {
    let dir = tempfile::tempdir().unwrap();
    // Nothing listens on the discard port
    let player = CadencePlayer::new(
        MockOutput::new(),
        FileStorage::new_from_path(dir.path()).unwrap(),
        Arc::new(HttpStreamCounter::new("http://127.0.0.1:9")),
        Settings::default(),
    );
    let mut receiver = player.subscribe();

    player.play(track("1")).await.unwrap();

    loop {
        let event = timeout(Duration::from_secs(10), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        if let PlayerEvent::Play(state) = event {
            assert!(state.is_playing);
            break;
        }
    }
    player.join().await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_repeat_one_session() {
    let output = MockOutput::new();
    let player = CadencePlayer::new(
        output.clone(),
        MemoryStorage::new_boxed(),
        Arc::new(HttpStreamCounter::new("http://127.0.0.1:9")),
        Settings::default(),
    );
    player.play(track("1")).await.unwrap();
    player.add_to_queue(track("2")).await.unwrap();
    player.cycle_repeat().await.unwrap();
    player.cycle_repeat().await.unwrap();
    output.advance_to(Duration::from_secs(180));

    player.track_ended().unwrap();
    player.next().await.unwrap();

    let status = player.get_current_status().await.unwrap();
    assert_eq!(Some(0), status.current_index);
    assert_eq!(Duration::ZERO, status.current_time);
    assert_eq!("0:00", format_time(status.current_time));
    assert_matches!(status.duration.map(format_time).as_deref(), Some("3:00"));
    player.join().await.unwrap();
}
