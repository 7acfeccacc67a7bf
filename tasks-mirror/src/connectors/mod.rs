//! Clients for the two remote stores.
//!
//! Each connector is a trait so the reconciliation core can be driven by test
//! doubles. Concrete HTTP implementations live in the `http` submodules.

pub mod google_tasks;
pub mod notion;

/// Builds the shared reqwest client used by both HTTP connectors.
pub fn http_client(timeout: std::time::Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}
