pub mod chat;
pub mod events;
pub mod presence;
pub mod report;
pub mod room;
pub mod session;
