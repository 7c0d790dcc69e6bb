/// Things that can go wrong in the API
pub mod error;
pub use error::Error;

/// The typed HTTP client
pub mod client;
pub use client::Client;

/// Register a new user
pub mod crear;
