#![allow(dead_code)]

use std::sync::Mutex;
use tasks_mirror::connectors::google_tasks::{self, Page, Task, TaskList, TasksConnector};
use tasks_mirror::connectors::notion::{self, DatabasePage, NotionConnector, Properties, QueryResponse};

/// A write the fake mirror received.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Create(Properties),
    Update(String, Properties),
}

/// In-memory Notion database that applies writes with partial-update semantics.
pub struct FakeNotion {
    page_size: usize,
    rows: Mutex<Vec<DatabasePage>>,
    writes: Mutex<Vec<Write>>,
}

impl FakeNotion {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            rows: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rows(page_size: usize, rows: Vec<DatabasePage>) -> Self {
        let fake = Self::new(page_size);
        *fake.rows.lock().unwrap() = rows;
        fake
    }

    pub fn rows(&self) -> Vec<DatabasePage> {
        self.rows.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }
}

impl NotionConnector for FakeNotion {
    async fn query_database(
        &self,
        _database_id: &str,
        start_cursor: Option<String>,
    ) -> Result<QueryResponse, notion::Error> {
        let rows = self.rows.lock().unwrap();
        let start: usize = start_cursor
            .map(|c| c.parse().expect("cursor is an index"))
            .unwrap_or(0);
        let end = (start + self.page_size).min(rows.len());
        let has_more = end < rows.len();
        Ok(QueryResponse {
            results: rows[start..end].to_vec(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        })
    }

    async fn create_page(
        &self,
        _database_id: &str,
        properties: Properties,
    ) -> Result<String, notion::Error> {
        let mut rows = self.rows.lock().unwrap();
        let id = format!("page-{}", rows.len() + 1);
        rows.push(DatabasePage {
            id: id.clone(),
            properties: properties.clone(),
        });
        self.writes.lock().unwrap().push(Write::Create(properties));
        Ok(id)
    }

    async fn update_page(&self, page_id: &str, properties: Properties) -> Result<(), notion::Error> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == page_id)
            .ok_or_else(|| notion::Error::Status {
                status: 404,
                code: "object_not_found".into(),
                message: page_id.to_string(),
            })?;
        row.properties.extend(properties.clone());
        self.writes
            .lock()
            .unwrap()
            .push(Write::Update(page_id.to_string(), properties));
        Ok(())
    }
}

/// In-memory task provider paginating both lists and tasks.
pub struct FakeTasks {
    page_size: usize,
    lists: Mutex<Vec<(TaskList, Vec<Task>)>>,
}

impl FakeTasks {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            lists: Mutex::new(Vec::new()),
        }
    }

    pub fn add_list(&self, id: &str, title: &str, tasks: Vec<Task>) {
        self.lists.lock().unwrap().push((
            TaskList {
                id: Some(id.into()),
                title: Some(title.into()),
            },
            tasks,
        ));
    }

    pub fn set_tasks(&self, list_id: &str, tasks: Vec<Task>) {
        let mut lists = self.lists.lock().unwrap();
        if let Some((_, existing)) = lists
            .iter_mut()
            .find(|(list, _)| list.id.as_deref() == Some(list_id))
        {
            *existing = tasks;
        }
    }

    fn paginate<T: Clone>(&self, items: &[T], page_token: Option<String>) -> Page<T> {
        let start: usize = page_token
            .map(|t| t.parse().expect("page token is an index"))
            .unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        Page {
            items: items[start..end].to_vec(),
            next_page_token: (end < items.len()).then(|| end.to_string()),
        }
    }
}

impl TasksConnector for FakeTasks {
    async fn list_task_lists(
        &self,
        page_token: Option<String>,
    ) -> Result<Page<TaskList>, google_tasks::Error> {
        let lists: Vec<TaskList> = self
            .lists
            .lock()
            .unwrap()
            .iter()
            .map(|(list, _)| list.clone())
            .collect();
        Ok(self.paginate(&lists, page_token))
    }

    async fn list_tasks(
        &self,
        list_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Task>, google_tasks::Error> {
        let lists = self.lists.lock().unwrap();
        let tasks = lists
            .iter()
            .find(|(list, _)| list.id.as_deref() == Some(list_id))
            .map(|(_, tasks)| tasks.clone())
            .ok_or(google_tasks::Error::Status {
                status: 404,
                body: list_id.to_string(),
            })?;
        Ok(self.paginate(&tasks, page_token))
    }
}

pub fn task(title: &str, status: &str) -> Task {
    Task {
        title: Some(title.into()),
        status: Some(status.into()),
        ..Default::default()
    }
}
