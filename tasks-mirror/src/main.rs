use clap::{Parser, Subcommand};
use log::{LevelFilter, info};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Logger, Root};
use std::str::FromStr;
use std::time::Duration;
use tasks_mirror::config::Config;
use tasks_mirror::connectors::google_tasks::credentials::CredentialStore;
use tasks_mirror::connectors::google_tasks::http::GoogleTasksConnector;
use tasks_mirror::connectors::http_client;
use tasks_mirror::connectors::notion::http::NotionHttpConnector;
use tasks_mirror::scheduler::Scheduler;
use tasks_mirror::sync::{Pass, Reconciler};
use tokio_util::sync::CancellationToken;

/// Mirror Google Tasks into a Notion database
#[derive(Parser, Debug)]
struct Cli {
    /// Config file (TOML); defaults to tasks-mirror/config.toml when present
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Sync now and then on the configured interval (default)
    Run,
    /// Run a single sync pass and exit
    Once,
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let level = LevelFilter::from_str(level)?;
    let stdout = ConsoleAppender::builder().build();
    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .logger(Logger::builder().build("tasks_mirror", level))
        .build(Root::builder().appender("stdout").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::load(args.config.as_deref())?;
    init_logging(&config.logging.level)?;

    let client = http_client(Duration::from_secs(config.http.timeout_secs))?;
    let credentials = CredentialStore::open(&config.google.credentials_file).await?;
    let tasks = GoogleTasksConnector::new(
        client.clone(),
        &config.google.base_url,
        credentials,
        config.google.list_page_size,
        config.google.task_page_size,
    );
    let notion = NotionHttpConnector::new(
        client,
        &config.notion.base_url,
        &config.notion.token,
        &config.notion.version,
    );
    let reconciler = Reconciler::new(&tasks, &notion, &config.notion.database_id);

    match args.command.unwrap_or(Commands::Run) {
        Commands::Once => {
            let summary = reconciler.run_pass().await?;
            info!("Sync complete ({})", summary);
        }
        Commands::Run => {
            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, stopping after the current pass");
                    on_ctrl_c.cancel();
                }
            });
            let scheduler =
                Scheduler::new(Duration::from_secs(config.schedule.interval_secs), cancel);
            scheduler.run(&reconciler).await?;
        }
    }
    Ok(())
}
