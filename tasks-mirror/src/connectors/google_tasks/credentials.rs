//! Authorized-user OAuth credentials for Google APIs.
//!
//! Reads the `token.json` file written by Google's installed-app consent flow
//! and keeps its access token fresh using the stored refresh token. Running
//! the consent flow itself is out of scope; the file must already exist.

use super::Error;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the recorded expiry.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthorizedUser {
    #[serde(default)]
    pub token: Option<String>,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    /// Fields written by Google's tooling that are carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl AuthorizedUser {
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Credentials(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            Error::Credentials(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    pub async fn save(&self, path: &Path) -> Result<(), Error> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Credentials(format!("cannot serialize credentials: {}", e)))?;
        tokio::fs::write(path, contents).await.map_err(|e| {
            Error::Credentials(format!("cannot write {}: {}", path.display(), e))
        })
    }

    /// Returns the access token when it is present and not about to expire.
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.token.as_deref()?;
        match self.expiry {
            Some(expiry) if expiry - Duration::seconds(EXPIRY_SKEW_SECS) <= now => None,
            _ => Some(token),
        }
    }

    /// Exchanges the refresh token for a new access token.
    pub async fn refresh(&mut self, client: &reqwest::Client) -> Result<(), Error> {
        debug!("Refreshing Google access token via {}", self.token_uri);
        let response = client
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(if status.is_client_error() {
                Error::Credentials(format!("token refresh rejected ({}): {}", status, body))
            } else {
                Error::Status {
                    status: status.as_u16(),
                    body,
                }
            });
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        self.token = Some(refreshed.access_token);
        self.expiry = refreshed
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        info!("Refreshed Google access token");
        Ok(())
    }
}

/// Holds credentials in memory and persists them after every refresh.
pub struct CredentialStore {
    path: PathBuf,
    user: tokio::sync::Mutex<AuthorizedUser>,
}

impl CredentialStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let user = AuthorizedUser::load(&path).await?;
        Ok(Self {
            path,
            user: tokio::sync::Mutex::new(user),
        })
    }

    #[cfg(test)]
    pub(crate) fn in_memory(path: PathBuf, user: AuthorizedUser) -> Self {
        Self {
            path,
            user: tokio::sync::Mutex::new(user),
        }
    }

    /// Returns a usable access token, refreshing and saving it first if needed.
    pub async fn access_token(&self, client: &reqwest::Client) -> Result<String, Error> {
        let mut user = self.user.lock().await;
        if let Some(token) = user.valid_token(Utc::now()) {
            return Ok(token.to_string());
        }
        user.refresh(client).await?;
        user.save(&self.path).await?;
        user.token
            .clone()
            .ok_or_else(|| Error::Credentials("refresh returned no access token".to_string()))
    }

    /// Forgets the current access token so the next call refreshes it.
    pub async fn invalidate(&self) {
        self.user.lock().await.token = None;
    }
}
