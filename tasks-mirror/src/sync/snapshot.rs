//! Identity-keyed snapshot of the mirror database.

use super::change::ComparableFields;
use super::{Error, IdentityKey, schema};
use crate::connectors::notion::{self, DatabasePage, NotionConnector, PropertyValue};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Read-only view of one mirror row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnapshotEntry {
    pub id: String,
    pub fields: ComparableFields,
}

pub type Snapshot = HashMap<IdentityKey, SnapshotEntry>;

/// Reads a row's identity and comparable fields.
///
/// Rows without a title or list name cannot be matched and come back as
/// [`Error::MalformedRecord`].
pub fn entry_from_page(page: &DatabasePage) -> Result<(IdentityKey, SnapshotEntry), Error> {
    let text = |name: &str| {
        page.properties
            .get(name)
            .and_then(PropertyValue::first_text)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    };
    let title = text(schema::NAME)
        .ok_or_else(|| Error::MalformedRecord(format!("row {} has no title", page.id)))?;
    let list = text(schema::LIST)
        .ok_or_else(|| Error::MalformedRecord(format!("row {} has no list name", page.id)))?;

    Ok((
        IdentityKey::new(title, list),
        SnapshotEntry {
            id: page.id.clone(),
            fields: ComparableFields::from_properties(&page.properties),
        },
    ))
}

/// Pages through the whole database and keys every usable row by identity.
///
/// Duplicate keys resolve last-write-wins: a later row replaces an earlier one.
pub async fn build_snapshot<N: NotionConnector>(
    mirror: &N,
    database_id: &str,
) -> Result<Snapshot, Error> {
    let mut snapshot = Snapshot::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    loop {
        let response = mirror.query_database(database_id, cursor.take()).await?;
        pages += 1;
        debug!(
            "Snapshot page {} returned {} rows",
            pages,
            response.results.len()
        );

        for page in &response.results {
            match entry_from_page(page) {
                Ok((key, entry)) => {
                    if let Some(previous) = snapshot.insert(key.clone(), entry) {
                        warn!(
                            "Duplicate mirror rows for {}; keeping {} over {}",
                            key, page.id, previous.id
                        );
                    }
                }
                Err(e) => warn!("Excluding mirror row from snapshot: {}", e),
            }
        }

        if !response.has_more {
            break;
        }
        match response.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                return Err(notion::Error::MalformedResponse(
                    "has_more set without next_cursor".to_string(),
                )
                .into());
            }
        }
    }

    info!("Snapshot holds {} mirror rows", snapshot.len());
    Ok(snapshot)
}
