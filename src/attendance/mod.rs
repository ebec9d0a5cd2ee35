// Public API - what other modules can use
pub use handlers::{
    daily_roster, event_attendance, modify_attendance, modify_enrollment, my_event_attendance,
    my_event_redirect,
};
pub use service::AttendanceService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
