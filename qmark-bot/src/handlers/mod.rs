//! Handler implementations: message-log persistence.

mod persistence_handler;

pub use persistence_handler::PersistenceHandler;
