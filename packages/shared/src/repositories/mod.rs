pub mod chat_repository;
pub mod errors;
pub mod in_memory;
pub mod presence_repository;
pub mod report_repository;
