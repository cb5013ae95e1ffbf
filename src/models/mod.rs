pub mod app_state;
pub mod config;
pub mod messages;

// Re-export important types
pub use app_state::*;
pub use config::*;
pub use messages::*;
