pub mod chat_service;
pub mod connection_hub;
pub mod connection_registry;
pub mod errors;
pub mod match_queue;
pub mod report_service;
pub mod room_manager;
pub mod signal_relay;
