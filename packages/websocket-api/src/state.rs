use std::sync::Arc;
use std::time::Duration;

use aws_sdk_dynamodb::Client;
use shared::repositories::chat_repository::{ChatRepository, DynamoDbChatRepository};
use shared::repositories::in_memory::InMemoryStore;
use shared::repositories::presence_repository::{DynamoDbPresenceRepository, PresenceRepository};
use shared::repositories::report_repository::{DynamoDbReportRepository, ReportRepository};
use shared::services::chat_service::ChatService;
use shared::services::connection_hub::ConnectionHub;
use shared::services::connection_registry::ConnectionRegistry;
use shared::services::match_queue::MatchQueue;
use shared::services::report_service::ReportService;
use shared::services::room_manager::RoomManager;
use shared::services::signal_relay::SignalRelay;

use crate::config::Config;

/// The durable store seams the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub presence: Arc<dyn PresenceRepository>,
    pub chat: Arc<dyn ChatRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl Repositories {
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Repositories {
            presence: store.clone(),
            chat: store.clone(),
            reports: store,
        }
    }

    pub fn dynamodb(
        client: Client,
        presence_table: &str,
        messages_table: &str,
        reports_table: &str,
    ) -> Self {
        Repositories {
            presence: Arc::new(DynamoDbPresenceRepository::new(
                client.clone(),
                presence_table,
            )),
            chat: Arc::new(DynamoDbChatRepository::new(client.clone(), messages_table)),
            reports: Arc::new(DynamoDbReportRepository::new(client, reports_table)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub queue: Arc<MatchQueue>,
    pub rooms: Arc<RoomManager>,
    pub hub: Arc<ConnectionHub>,
    pub relay: SignalRelay,
    pub chat_service: Arc<ChatService>,
    pub report_service: Arc<ReportService>,
    pub settle_delay: Duration,
    pub history_limit: usize,
}

impl AppState {
    pub fn new(config: &Config, repositories: Repositories) -> Self {
        let rooms = Arc::new(RoomManager::new());
        let hub = Arc::new(ConnectionHub::new());
        let relay = SignalRelay::new(rooms.clone(), hub.clone());

        let registry = Arc::new(ConnectionRegistry::new(
            repositories.presence,
            config.persistence_timeout,
        ));
        let chat_service = Arc::new(ChatService::new(
            rooms.clone(),
            relay.clone(),
            repositories.chat,
            config.persistence_timeout,
            config.max_message_length,
        ));
        let report_service = Arc::new(ReportService::new(
            repositories.reports,
            config.persistence_timeout,
        ));

        AppState {
            registry,
            queue: Arc::new(MatchQueue::new()),
            rooms,
            hub,
            relay,
            chat_service,
            report_service,
            settle_delay: config.settle_delay,
            history_limit: config.history_limit,
        }
    }
}
