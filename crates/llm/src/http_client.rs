//! HTTP Client Factory
//!
//! Builds reqwest clients with the bounded call timeout the engine's latency
//! budget demands. A slow generative dependency can delay one turn by at
//! most the configured timeout; it can never stall the engine indefinitely.

use std::time::Duration;

/// Build a `reqwest::Client` with a hard per-request timeout.
pub fn build_http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("failed to build reqwest client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let _client = build_http_client(30);
        let _short = build_http_client(2);
    }
}
