//! Play chess against a language model that answers in free text.
//!
//! The model's reply is turned into a legal move by [`game::extractor`],
//! wrapped in the bounded retry loop of [`game::session::GameSession`].

pub mod completion;
pub mod game;
pub mod models;
pub mod routes;
pub mod websocket;

pub use completion::{CompletionError, CompletionService};
pub use game::session::{GameSession, SessionError};
pub use models::config::{GameConfig, PromptTemplates, ProviderConfig};
