use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, warn};

use crate::actions::connect::handle_connect;
use crate::actions::default::{handle_default_message, parse_frame};
use crate::actions::disconnect::handle_disconnect;
use crate::actions::handle_event;
use crate::state::AppState;

const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One socket: a writer task drains the connection's outbound channel while
/// inbound frames are handled in arrival order on this task.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (connection_id, mut outbound) = handle_connect(&state);
    let (mut sender, mut receiver) = socket.split();

    let writer_id = connection_id.clone();
    let mut writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize {} for {}: {}", event.name(), writer_id, e);
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(text.into())).await {
                debug!("Socket for {} closed while sending: {}", writer_id, e);
                break;
            }
        }
        if let Err(e) = sender.close().await {
            debug!("Socket for {} was already closed: {}", writer_id, e);
        }
    });

    while let Some(frame) = receiver.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        };

        match frame {
            Message::Text(text) => match parse_frame(text.as_str()) {
                Ok(event) => handle_event(&connection_id, event, &state).await,
                Err((event, message)) => {
                    handle_default_message(&connection_id, event, message, &state)
                }
            },
            Message::Close(_) => break,
            _ => debug!("Ignoring non-text frame from {}", connection_id),
        }
    }

    handle_disconnect(&connection_id, &state).await;

    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer)
        .await
        .is_err()
    {
        writer.abort();
    }
}
