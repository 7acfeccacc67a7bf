//! REST implementation of the task provider connector.

use super::credentials::CredentialStore;
use super::{Error, Page, Task, TaskList, TasksConnector};
use log::{debug, warn};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

pub struct GoogleTasksConnector {
    client: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
    list_page_size: u32,
    task_page_size: u32,
}

impl GoogleTasksConnector {
    /// Creates a connector rooted at `base_url`, e.g. `https://tasks.googleapis.com/tasks/v1`.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        credentials: CredentialStore,
        list_page_size: u32,
        task_page_size: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            list_page_size,
            task_page_size,
        }
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        let mut retried = false;
        loop {
            let token = self.credentials.access_token(&self.client).await?;
            debug!("GET {}", url);
            let response = self
                .client
                .get(url.clone())
                .bearer_auth(token)
                .query(query)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !retried {
                // The stored expiry can be wrong; force one refresh.
                warn!("Task provider rejected access token, refreshing once");
                self.credentials.invalidate().await;
                retried = true;
                continue;
            }
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(Error::Unauthorized(status.as_u16()));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            return response
                .json()
                .await
                .map_err(|e| Error::MalformedResponse(e.to_string()));
        }
    }
}

fn with_page_token(mut query: Vec<(&'static str, String)>, page_token: Option<String>) -> Vec<(&'static str, String)> {
    if let Some(token) = page_token {
        query.push(("pageToken", token));
    }
    query
}

impl TasksConnector for GoogleTasksConnector {
    async fn list_task_lists(&self, page_token: Option<String>) -> Result<Page<TaskList>, Error> {
        let query = with_page_token(
            vec![("maxResults", self.list_page_size.to_string())],
            page_token,
        );
        self.get_json(&["users", "@me", "lists"], &query).await
    }

    async fn list_tasks(
        &self,
        list_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Task>, Error> {
        let query = with_page_token(
            vec![
                ("showCompleted", "true".to_string()),
                ("showHidden", "true".to_string()),
                ("maxResults", self.task_page_size.to_string()),
            ],
            page_token,
        );
        self.get_json(&["lists", list_id, "tasks"], &query).await
    }
}
