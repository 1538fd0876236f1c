pub mod client;
pub mod contributions;
pub mod events;
pub mod profile;
pub mod repos;

pub use client::GitHubClient;
