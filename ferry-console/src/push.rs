//! Push channel listener
//!
//! Keeps one subscription to the runner's event stream open for the life of
//! the console and forwards what arrives, in order. Lost or refused
//! connections are retried with exponential backoff.

use crate::event::PushMessage;
use ferry_client::RunnerClient;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

const INITIAL_DELAY_MS: u64 = 500;
const MAX_DELAY_MS: u64 = 30_000;

/// Spawns the listener; it ends once the receiving side is dropped
pub fn spawn_push_listener(client: RunnerClient, tx: UnboundedSender<PushMessage>) -> JoinHandle<()> {
    tokio::spawn(async move { listen(client, tx).await })
}

async fn listen(client: RunnerClient, tx: UnboundedSender<PushMessage>) {
    let mut delay_ms = INITIAL_DELAY_MS;
    let mut unavailable_reported = false;

    loop {
        if tx.is_closed() {
            break;
        }

        match client.subscribe_events().await {
            Ok(mut stream) => {
                info!("Subscribed to runner events at {}", client.base_url());
                delay_ms = INITIAL_DELAY_MS;
                unavailable_reported = false;
                if tx.send(PushMessage::Connected).is_err() {
                    break;
                }

                let reason = loop {
                    match stream.next_event().await {
                        Ok(Some(event)) => {
                            if tx.send(PushMessage::Event(event)).is_err() {
                                debug!("Console gone, closing event stream");
                                return;
                            }
                        }
                        Ok(None) => break "stream closed by runner".to_string(),
                        Err(e) => break e.to_string(),
                    }
                };

                warn!("Runner event stream lost: {}", reason);
                if tx.send(PushMessage::Disconnected(reason)).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to subscribe to runner events: {}", e);
                if !unavailable_reported {
                    unavailable_reported = true;
                    if tx.send(PushMessage::Unavailable(e.to_string())).is_err() {
                        break;
                    }
                }
            }
        }

        debug!("Reconnecting in {} ms...", delay_ms);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        // Exponential backoff with cap
        delay_ms = (delay_ms * 2).min(MAX_DELAY_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::dto::event::{LogEvent, PushEvent, StatusUpdate};
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_forwards_events_then_reports_disconnect() {
        let server = MockServer::start().await;
        let body = concat!(
            r#"{"event": "status_update", "data": {"running": true, "message": "Migration started"}}"#,
            "\n",
            r#"{"event": "log", "data": {"data": "➡ Processing page 1"}}"#,
            "\n",
        );
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_push_listener(RunnerClient::new(server.uri()), tx);

        assert_eq!(rx.recv().await, Some(PushMessage::Connected));
        assert_eq!(
            rx.recv().await,
            Some(PushMessage::Event(PushEvent::StatusUpdate(StatusUpdate {
                running: true,
                message: Some("Migration started".to_string()),
                ..Default::default()
            })))
        );
        assert_eq!(
            rx.recv().await,
            Some(PushMessage::Event(PushEvent::Log(LogEvent {
                data: Some("➡ Processing page 1".to_string())
            })))
        );
        assert!(matches!(rx.recv().await, Some(PushMessage::Disconnected(_))));

        // Reconnects after the backoff delay
        assert_eq!(rx.recv().await, Some(PushMessage::Connected));

        drop(rx);
        handle.abort();
    }

    #[tokio::test]
    async fn test_unavailable_reported_once_per_streak() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_push_listener(RunnerClient::new(server.uri()), tx);

        assert!(matches!(rx.recv().await, Some(PushMessage::Unavailable(_))));

        // Two more attempts fit in 2 s (500 ms + 1000 ms) without another report
        let next = tokio::time::timeout(Duration::from_millis(2000), rx.recv()).await;
        assert!(next.is_err());

        handle.abort();
    }

    #[tokio::test]
    async fn test_stops_when_receiver_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let handle = spawn_push_listener(RunnerClient::new(server.uri()), tx);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
