pub mod auth;
pub mod error;
pub mod gce;
pub mod types;

// Re-export common auth
pub use auth::{TokenSource, fetch_access_token};
pub use error::{ComputeError, Result};
