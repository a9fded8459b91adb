// hubstat-api: Async Rust client for the GitHub REST API (repository statistics)

pub mod client;
pub mod error;
pub mod types;

pub use client::GitHubClient;
pub use error::Error;
pub use types::Repository;
