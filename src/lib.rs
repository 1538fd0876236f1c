pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod server;
pub mod stats;
pub mod wrapped;

pub use config::Config;
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use server::{create_app, AppState};
pub use wrapped::build_wrapped;
