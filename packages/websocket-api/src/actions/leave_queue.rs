use shared::models::events::ServerEvent;
use tracing::debug;

use crate::actions::reply;
use crate::state::AppState;

pub fn handle_leave_queue(connection_id: &str, state: &AppState) {
    if !state.queue.remove(connection_id) {
        debug!("Connection {} was not waiting", connection_id);
    }
    reply(state, connection_id, ServerEvent::QueueLeft {});
}
