pub mod chat_service_errors;
pub mod report_service_errors;
pub mod room_errors;
