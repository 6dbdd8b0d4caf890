use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::models::events::ServerEvent;

/// Outbound side of every live connection. The transport drains the receiver
/// returned by [`ConnectionHub::attach`] into its socket.
#[derive(Default)]
pub struct ConnectionHub {
    channels: RwLock<HashMap<String, UnboundedSender<ServerEvent>>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the outbound channel for a connection, replacing any previous one.
    pub fn attach(&self, connection_id: &str) -> UnboundedReceiver<ServerEvent> {
        let (tx, rx) = unbounded_channel();
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(connection_id.to_string(), tx);
        rx
    }

    pub fn detach(&self, connection_id: &str) {
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(connection_id);
    }

    pub fn is_attached(&self, connection_id: &str) -> bool {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(connection_id)
    }

    /// Queues `event` for one connection. Returns false when the connection is
    /// gone, which callers treat as a normal outcome.
    pub fn send_to(&self, connection_id: &str, event: ServerEvent) -> bool {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        match channels.get(connection_id) {
            Some(tx) => {
                debug!("Queueing {} for connection {}", event.name(), connection_id);
                tx.send(event).is_ok()
            }
            None => {
                debug!(
                    "Connection {} is not attached, dropping {}",
                    connection_id,
                    event.name()
                );
                false
            }
        }
    }
}
