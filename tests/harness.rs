use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use shared::models::events::{ClientEvent, ServerEvent};
use shared::models::session::Mode;
use shared::repositories::in_memory::InMemoryStore;
use tokio::sync::mpsc::UnboundedReceiver;
use websocket_api::actions::connect::handle_connect;
use websocket_api::actions::default::{handle_default_message, parse_frame};
use websocket_api::actions::disconnect::handle_disconnect;
use websocket_api::actions::handle_event;
use websocket_api::config::Config;
use websocket_api::state::{AppState, Repositories};

pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

pub fn test_config() -> Config {
    Config {
        settle_delay: SETTLE_DELAY,
        persistence_timeout: Duration::from_secs(2),
        ..Config::default()
    }
}

pub struct TestServer {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
}

impl TestServer {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(&test_config(), Repositories::in_memory(store.clone()));
        TestServer { state, store }
    }

    /// A server whose repositories are supplied by the test; `store` is then
    /// only an inspection handle for whatever the test wired to it.
    pub fn with_repositories(repositories: Repositories, store: Arc<InMemoryStore>) -> Self {
        TestServer {
            state: AppState::new(&test_config(), repositories),
            store,
        }
    }

    pub fn connect(&self) -> TestClient {
        let (id, outbound) = handle_connect(&self.state);
        TestClient {
            id,
            outbound,
            state: self.state.clone(),
        }
    }
}

impl Default for TestServer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestClient {
    pub id: String,
    outbound: UnboundedReceiver<ServerEvent>,
    state: AppState,
}

impl TestClient {
    pub async fn send(&self, event: ClientEvent) {
        handle_event(&self.id, event, &self.state).await;
    }

    /// Sends a raw text frame the way the websocket route does.
    pub async fn send_frame(&self, frame: &str) {
        match parse_frame(frame) {
            Ok(event) => self.send(event).await,
            Err((event, message)) => handle_default_message(&self.id, event, message, &self.state),
        }
    }

    pub async fn join(&self, language: &str, interests: &[&str], mode: Mode) {
        self.send(join_event(language, interests, mode)).await;
    }

    pub async fn say(&self, room_id: &str, text: &str) {
        self.send_frame(
            &json!({"event": "send_message", "data": {"roomId": room_id, "text": text}})
                .to_string(),
        )
        .await;
    }

    pub async fn skip(&self, room_id: &str) {
        self.send_frame(&json!({"event": "skip_partner", "data": {"roomId": room_id}}).to_string())
            .await;
    }

    pub async fn disconnect(self) {
        handle_disconnect(&self.id, &self.state).await;
    }

    /// Everything delivered to this client so far.
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.outbound.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn join_event(language: &str, interests: &[&str], mode: Mode) -> ClientEvent {
    let frame = json!({
        "event": "join_queue",
        "data": {
            "interests": interests,
            "language": language,
            "location": "",
            "mode": mode,
        }
    });
    serde_json::from_value(frame).unwrap_or_else(|e| panic!("bad join_queue frame: {}", e))
}

/// The `(roomId, initiator)` of the first `match_found` among `events`.
pub fn match_found(events: &[ServerEvent]) -> Option<(String, bool)> {
    events.iter().find_map(|event| match event {
        ServerEvent::MatchFound {
            room_id, initiator, ..
        } => Some((room_id.clone(), *initiator)),
        _ => None,
    })
}

pub fn count_named(events: &[ServerEvent], name: &str) -> usize {
    events.iter().filter(|event| event.name() == name).count()
}
