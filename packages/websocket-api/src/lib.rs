pub mod actions;
pub mod config;
pub mod routes;
pub mod state;
