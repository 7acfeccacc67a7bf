//! Fetches every task from every list of the source provider.

use super::Error;
use crate::connectors::google_tasks::{Task, TaskList, TasksConnector};
use log::{debug, info, warn};

/// A task list with the id and title identity requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceList {
    pub id: String,
    pub title: String,
}

impl TryFrom<TaskList> for SourceList {
    type Error = Error;

    fn try_from(list: TaskList) -> Result<Self, Self::Error> {
        match (list.id, list.title) {
            (Some(id), Some(title)) if !id.is_empty() && !title.trim().is_empty() => {
                Ok(SourceList { id, title })
            }
            (id, _) => Err(Error::MalformedRecord(format!(
                "task list {} has no id or title",
                id.unwrap_or_default()
            ))),
        }
    }
}

async fn fetch_lists<T: TasksConnector>(tasks: &T) -> Result<Vec<SourceList>, Error> {
    let mut lists = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = tasks.list_task_lists(page_token.take()).await?;
        debug!("Fetched a page of {} task lists", page.items.len());
        for list in page.items {
            match SourceList::try_from(list) {
                Ok(list) => lists.push(list),
                Err(e) => warn!("Skipping task list: {}", e),
            }
        }
        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }
    Ok(lists)
}

async fn fetch_tasks<T: TasksConnector>(tasks: &T, list: &SourceList) -> Result<Vec<Task>, Error> {
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = tasks.list_tasks(&list.id, page_token.take()).await?;
        items.extend(page.items);
        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }
    debug!("Fetched {} tasks from list '{}'", items.len(), list.title);
    Ok(items)
}

/// Returns (list, task) pairs in list-then-task order, completed and hidden tasks included.
pub async fn fetch_all_tasks<T: TasksConnector>(
    tasks: &T,
) -> Result<Vec<(SourceList, Task)>, Error> {
    let lists = fetch_lists(tasks).await?;
    let mut pairs = Vec::new();
    for list in lists {
        let list_tasks = fetch_tasks(tasks, &list).await?;
        pairs.extend(list_tasks.into_iter().map(|task| (list.clone(), task)));
    }
    info!("Fetched {} source tasks", pairs.len());
    Ok(pairs)
}
