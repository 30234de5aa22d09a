//! quizdeck-client — quiz service gateway and local session state.
//!
//! Implements the `QuizApi` trait over HTTP, loads configuration, and keeps
//! the signed-in identity, player name and bearer token on disk.

pub mod auth;
pub mod config;
pub mod http;
pub mod mock;
mod schema;
pub mod store;

pub use auth::{AuthContext, Identity, NoTokenProvider, StaticTokenProvider, TokenProvider, View};
pub use config::{create_api, load_config, load_config_from, QuizdeckConfig};
pub use http::HttpQuizApi;
pub use store::SessionStore;
