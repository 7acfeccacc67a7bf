//! REST implementation of the mirror store connector.

use super::{DatabasePage, Error, NotionConnector, Properties, QueryResponse};
use log::debug;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub struct NotionHttpConnector {
    client: reqwest::Client,
    base_url: String,
    token: String,
    version: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl NotionHttpConnector {
    /// Creates a connector rooted at `base_url`, e.g. `https://api.notion.com/v1`.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            version: version.into(),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let response = self
            .client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                code: body.code,
                message: if body.message.is_empty() {
                    text
                } else {
                    body.message
                },
            });
        }
        response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

impl NotionConnector for NotionHttpConnector {
    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<String>,
    ) -> Result<QueryResponse, Error> {
        let body = match start_cursor {
            Some(cursor) => json!({ "start_cursor": cursor }),
            None => json!({}),
        };
        self.send(
            Method::POST,
            &format!("/databases/{}/query", database_id),
            body,
        )
        .await
    }

    async fn create_page(
        &self,
        database_id: &str,
        properties: Properties,
    ) -> Result<String, Error> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        let page: DatabasePage = self.send(Method::POST, "/pages", body).await?;
        Ok(page.id)
    }

    async fn update_page(&self, page_id: &str, properties: Properties) -> Result<(), Error> {
        let body = json!({ "properties": properties });
        let _: DatabasePage = self
            .send(Method::PATCH, &format!("/pages/{}", page_id), body)
            .await?;
        Ok(())
    }
}
