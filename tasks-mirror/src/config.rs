use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "tasks-mirror/config";
pub const ENV_PREFIX: &str = "TASKS_MIRROR";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub google: GoogleConfig,
    pub notion: NotionConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GoogleConfig {
    /// Authorized-user credentials file (`token.json`).
    pub credentials_file: PathBuf,
    #[serde(default = "default_google_base_url")]
    pub base_url: String,
    #[serde(default = "default_list_page_size")]
    pub list_page_size: u32,
    #[serde(default = "default_task_page_size")]
    pub task_page_size: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
    #[serde(default = "default_notion_base_url")]
    pub base_url: String,
    #[serde(default = "default_notion_version")]
    pub version: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads the optional config file, then applies `TASKS_MIRROR__*` environment overrides.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let s = config::Config::builder()
            .add_source(
                config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_FILE)).required(path.is_some()),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }
}

fn default_google_base_url() -> String {
    "https://tasks.googleapis.com/tasks/v1".to_string()
}

fn default_list_page_size() -> u32 {
    10
}

fn default_task_page_size() -> u32 {
    100
}

fn default_notion_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

fn default_interval_secs() -> u64 {
    600
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
