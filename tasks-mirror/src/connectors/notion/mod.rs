//! Notion connectivity for the mirror database.
//!
//! This module provides:
//! - Error types for mirror store failures
//! - The `NotionConnector` trait used by the snapshot builder and reconciler
//! - Wire types for database pages and query results
//!
//! Property values and their extraction rules live in [`properties`].

use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;
pub mod properties;

pub use properties::{DateRange, Properties, PropertyValue, RichText, SelectOption};

/// Errors that can occur while talking to the mirror store.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (connect failure, timeout)
    #[error("Request to Notion failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The integration token was rejected or lacks access to the database
    #[error("Notion rejected credentials (status {0})")]
    Unauthorized(u16),
    /// Any other non-success status, carrying Notion's error code when present
    #[error("Notion returned status {status} ({code}): {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },
    /// The response body did not match the expected shape
    #[error("Malformed Notion response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Whether retrying the same request later can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Status { status, code, .. } => {
                *status == 429 || *status >= 500 || code == "conflict_error"
            }
            Error::Unauthorized(_) | Error::MalformedResponse(_) => false,
        }
    }

    /// Whether the integration token is unusable until someone fixes it.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }
}

/// A row of the mirror database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct DatabasePage {
    pub id: String,
    #[serde(default)]
    pub properties: Properties,
}

/// One page of database query results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<DatabasePage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Trait for abstracting mirror store reads and writes.
#[automock]
pub trait NotionConnector {
    /// Retrieves one page of rows from a database, starting at `start_cursor`.
    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<String>,
    ) -> Result<QueryResponse, Error>;

    /// Creates a row in the database and returns its page id.
    async fn create_page(&self, database_id: &str, properties: Properties)
    -> Result<String, Error>;

    /// Sets the given properties on an existing row. Properties not in the map are left untouched.
    async fn update_page(&self, page_id: &str, properties: Properties) -> Result<(), Error>;
}
