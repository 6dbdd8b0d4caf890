pub mod persistence_errors;

pub use persistence_errors::PersistenceError;
