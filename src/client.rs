use std::time::Duration;

use once_cell::sync::Lazy;

/// Process-wide HTTP client. Cloning it is cheap and shares the connection pool.
///
/// The default reqwest client has no overall timeout, so a stalled API call
/// would otherwise hang the whole provisioning flow.
pub static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("failed to build reqwest client")
});
