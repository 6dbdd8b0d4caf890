pub mod connect;
pub mod default;
pub mod disconnect;
pub mod get_history;
pub mod join_queue;
pub mod leave_queue;
pub mod report_user;
pub mod send_message;
pub mod signal;
pub mod skip_partner;
pub mod typing;

use shared::models::events::{ClientEvent, ServerEvent};
use tracing::debug;

use crate::state::AppState;

/// Runs one inbound event for a connection to completion. Every outcome is
/// reported back through the connection hub; nothing here fails the socket.
pub async fn handle_event(connection_id: &str, event: ClientEvent, state: &AppState) {
    debug!("Handling {} from connection {}", event.name(), connection_id);

    match event {
        ClientEvent::JoinQueue(request) => {
            join_queue::handle_join_queue(connection_id, request, state).await
        }
        ClientEvent::LeaveQueue => leave_queue::handle_leave_queue(connection_id, state),
        ClientEvent::Offer(request) => signal::handle_offer(connection_id, request, state),
        ClientEvent::Answer(request) => signal::handle_answer(connection_id, request, state),
        ClientEvent::IceCandidate(request) => {
            signal::handle_ice_candidate(connection_id, request, state)
        }
        ClientEvent::SendMessage(request) => {
            send_message::handle_send_message(connection_id, request, state).await
        }
        ClientEvent::TypingStart(request) => {
            typing::handle_typing_start(connection_id, request, state)
        }
        ClientEvent::TypingStop(request) => typing::handle_typing_stop(connection_id, request, state),
        ClientEvent::SkipPartner(request) => {
            skip_partner::handle_skip_partner(connection_id, request, state)
        }
        ClientEvent::ReportUser(request) => {
            report_user::handle_report_user(connection_id, request, state).await
        }
        ClientEvent::GetHistory(request) => {
            get_history::handle_get_history(connection_id, request, state).await
        }
    }
}

/// Sends `event` back to the connection that triggered it.
pub(crate) fn reply(state: &AppState, connection_id: &str, event: ServerEvent) {
    if !state.hub.send_to(connection_id, event) {
        debug!("Connection {} went away before its reply", connection_id);
    }
}

/// The user id a connection speaks as: the one it supplied, its session's, or
/// failing both the connection id itself.
pub(crate) fn speaking_as(state: &AppState, connection_id: &str, supplied: Option<String>) -> String {
    supplied
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .or_else(|| {
            state
                .registry
                .get(connection_id)
                .map(|session| session.display_id().to_string())
        })
        .unwrap_or_else(|| connection_id.to_string())
}
