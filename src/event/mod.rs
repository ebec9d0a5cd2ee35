// Public API - what other modules can use
pub use handlers::{cancel_event, create_event, get_event};
pub use service::EventService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
