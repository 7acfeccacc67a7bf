//! Google Tasks connectivity.
//!
//! This module provides:
//! - Error types for task provider failures
//! - The `TasksConnector` trait the fetcher pages through
//! - Wire types for task lists and tasks
//!
//! `http::GoogleTasksConnector` talks to the real REST API and
//! `credentials::AuthorizedUser` supplies its bearer token.

use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod credentials;
pub mod http;

/// Errors that can occur while talking to the task provider.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (connect failure, timeout)
    #[error("Request to task provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider rejected the credentials
    #[error("Task provider rejected credentials (status {0})")]
    Unauthorized(u16),
    /// Any other non-success status
    #[error("Task provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body did not match the expected shape
    #[error("Malformed task provider response: {0}")]
    MalformedResponse(String),
    /// The configured base URL cannot carry a request path
    #[error("Invalid task provider URL: {0}")]
    InvalidUrl(String),
    /// Loading, refreshing or saving credentials failed
    #[error("Credentials error: {0}")]
    Credentials(String),
}

impl Error {
    /// Whether retrying the same request later can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Status { status, .. } => *status == 429 || *status >= 500,
            Error::Unauthorized(_)
            | Error::MalformedResponse(_)
            | Error::InvalidUrl(_)
            | Error::Credentials(_) => false,
        }
    }

    /// Whether the stored credentials are unusable until someone re-authorizes.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, Error::Unauthorized(_) | Error::Credentials(_))
    }
}

/// A named collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct TaskList {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A single task as returned by the provider. Dates are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Task {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub completed: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_page_token: None,
        }
    }
}

/// Trait for abstracting task provider reads.
///
/// Implementations must request completed and hidden tasks; leaving either
/// out silently narrows what gets mirrored.
#[automock]
pub trait TasksConnector {
    /// Retrieves one page of the user's task lists.
    async fn list_task_lists(&self, page_token: Option<String>) -> Result<Page<TaskList>, Error>;

    /// Retrieves one page of tasks in a list, including completed and hidden ones.
    async fn list_tasks(
        &self,
        list_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Task>, Error>;
}
