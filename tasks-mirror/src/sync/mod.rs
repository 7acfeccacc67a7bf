//! The reconciliation core.
//!
//! One pass reads the whole mirror into a [`snapshot::Snapshot`], fetches every
//! source task, and then, task by task, inserts, updates or skips a mirror row.
//! The snapshot is never refreshed mid-pass, so all reads happen before any
//! write.

use crate::connectors::{google_tasks, notion};
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub mod change;
pub mod fetch;
pub mod reconciler;
pub mod record;
pub mod snapshot;

pub use reconciler::{Action, Pass, PassSummary, Reconciler};

/// Property names of the mirror database.
pub mod schema {
    pub const NAME: &str = "Name";
    pub const LIST: &str = "List";
    pub const STATUS: &str = "Status";
    pub const DESCRIPTION: &str = "Description";
    pub const START_DATE: &str = "Start Date";
    pub const DUE_DATE: &str = "Due Date";
    pub const COMPLETED_AT: &str = "Completed At";
    pub const UPDATED_AT: &str = "Updated At";
}

/// Matches a source task to a mirror row: (task title, list name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub title: String,
    pub list: String,
}

impl IdentityKey {
    pub fn new(title: impl Into<String>, list: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            list: list.into(),
        }
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' in list '{}'", self.title, self.list)
    }
}

/// Which remote store failed.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("task provider: {0}")]
    Tasks(#[from] google_tasks::Error),
    #[error("mirror store: {0}")]
    Mirror(#[from] notion::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    /// Transport or auth failure from either store. Aborts the pass.
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(#[from] RemoteError),
    /// A row or task lacking what identity needs. Excluded, never aborts the pass.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

impl From<google_tasks::Error> for Error {
    fn from(error: google_tasks::Error) -> Self {
        Error::RemoteUnavailable(RemoteError::Tasks(error))
    }
}

impl From<notion::Error> for Error {
    fn from(error: notion::Error) -> Self {
        Error::RemoteUnavailable(RemoteError::Mirror(error))
    }
}

impl Error {
    /// Whether the next scheduled pass can reasonably succeed without intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::RemoteUnavailable(RemoteError::Tasks(e)) => e.is_transient(),
            Error::RemoteUnavailable(RemoteError::Mirror(e)) => e.is_transient(),
            Error::MalformedRecord(_) => false,
        }
    }

    /// Whether no later pass can succeed until credentials are fixed.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::RemoteUnavailable(RemoteError::Tasks(e)) => e.is_credential_failure(),
            Error::RemoteUnavailable(RemoteError::Mirror(e)) => e.is_credential_failure(),
            Error::MalformedRecord(_) => false,
        }
    }
}
