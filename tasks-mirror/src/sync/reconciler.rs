//! Per-task insert/update/skip decisions and the writes they imply.

use super::change::has_changed;
use super::fetch::fetch_all_tasks;
use super::record::{ProjectedRecord, project};
use super::snapshot::{Snapshot, build_snapshot};
use super::{Error, IdentityKey};
use crate::connectors::google_tasks::TasksConnector;
use crate::connectors::notion::NotionConnector;
use log::{debug, info, warn};
use mockall::automock;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// What a pass does with one source task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The identity key is not in the snapshot.
    Insert,
    /// The key is present and at least one comparable field differs.
    Update { record_id: String },
    /// The key is present and nothing differs.
    Skip,
}

/// Counts of what one pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl PassSummary {
    fn count(&mut self, action: &Action) {
        match action {
            Action::Insert => self.inserted += 1,
            Action::Update { .. } => self.updated += 1,
            Action::Skip => self.unchanged += 1,
        }
    }

    pub fn writes(&self) -> usize {
        self.inserted + self.updated
    }
}

impl Display for PassSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} unchanged",
            self.inserted, self.updated, self.unchanged
        )
    }
}

/// One complete reconciliation pass.
#[automock]
pub trait Pass {
    async fn run_pass(&self) -> Result<PassSummary, Error>;
}

/// Decides the action for a projected record against the pre-pass snapshot.
pub fn decide(snapshot: &Snapshot, record: &ProjectedRecord) -> Action {
    match snapshot.get(&record.identity_key()) {
        None => Action::Insert,
        Some(entry) if has_changed(&entry.fields, record) => Action::Update {
            record_id: entry.id.clone(),
        },
        Some(_) => Action::Skip,
    }
}

/// Keeps only the last record seen for each identity key, in the order of
/// those last occurrences.
pub fn collapse_duplicates(records: Vec<ProjectedRecord>) -> Vec<ProjectedRecord> {
    let mut seen: HashSet<IdentityKey> = HashSet::new();
    let mut kept: Vec<ProjectedRecord> = records
        .into_iter()
        .rev()
        .filter(|record| {
            let key = record.identity_key();
            if seen.contains(&key) {
                warn!("Duplicate source tasks for {}; the last one wins", key);
                false
            } else {
                seen.insert(key);
                true
            }
        })
        .collect();
    kept.reverse();
    kept
}

pub struct Reconciler<'a, TASKS: TasksConnector, NOTION: NotionConnector> {
    tasks: &'a TASKS,
    notion: &'a NOTION,
    database_id: String,
}

impl<'a, TASKS: TasksConnector, NOTION: NotionConnector> Reconciler<'a, TASKS, NOTION> {
    pub fn new(tasks: &'a TASKS, notion: &'a NOTION, database_id: impl Into<String>) -> Self {
        Self {
            tasks,
            notion,
            database_id: database_id.into(),
        }
    }

    async fn apply(&self, record: &ProjectedRecord, action: &Action) -> Result<(), Error> {
        match action {
            Action::Insert => {
                info!(
                    "Inserting new task: {} in list {}",
                    record.title, record.list
                );
                let id = self
                    .notion
                    .create_page(&self.database_id, record.to_properties())
                    .await?;
                debug!("Created mirror row {}", id);
            }
            Action::Update { record_id } => {
                info!("Updating task: {} in list {}", record.title, record.list);
                self.notion
                    .update_page(record_id, record.to_properties())
                    .await?;
            }
            Action::Skip => {
                debug!("No change for task: {} in list {}", record.title, record.list);
            }
        }
        Ok(())
    }
}

impl<TASKS: TasksConnector, NOTION: NotionConnector> Pass for Reconciler<'_, TASKS, NOTION> {
    /// Reads the snapshot and the source, then writes task by task.
    ///
    /// A failed write aborts the rest of the pass.
    async fn run_pass(&self) -> Result<PassSummary, Error> {
        let snapshot = build_snapshot(self.notion, &self.database_id).await?;
        let pairs = fetch_all_tasks(self.tasks).await?;
        let records = collapse_duplicates(
            pairs
                .iter()
                .map(|(list, task)| project(task, &list.title))
                .collect(),
        );

        let mut summary = PassSummary::default();
        for record in &records {
            let action = decide(&snapshot, record);
            self.apply(record, &action).await?;
            summary.count(&action);
        }
        info!("Pass complete: {}", summary);
        Ok(summary)
    }
}
