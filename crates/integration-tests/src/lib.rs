//! Integration tests for Corner Shop.
//!
//! These tests talk to a running storefront over HTTP and are `#[ignore]`d
//! by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront (in-memory stores are fine)
//! cargo run -p corner-shop-storefront
//!
//! # Run integration tests
//! cargo test -p corner-shop-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Server under test (default: <http://localhost:3000>)

use reqwest::Client;

/// Base URL for the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client that keeps cookies, so each client is one shopper's session.
///
/// Redirects are not followed so tests can assert on `Location`.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn session_client() -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}
