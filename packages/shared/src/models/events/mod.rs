pub mod requests;
pub mod responses;

pub use requests::ClientEvent;
pub use responses::{PartnerSummary, ServerEvent};
