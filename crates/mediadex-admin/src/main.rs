//! mediadex-admin - interactive ops console for the file index.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mediadex_admin::{AdminConsole, AdminList, AutoDeleteControls};
use mediadex_autodelete::{DeletionScheduler, SchedulerConfig};
use mediadex_db::{Database, PoolConfig, ShardUrls};
use mediadex_index::FederatedIndex;
use mediadex_telegram::BotClient;

/// Synthetic identity for the local operator driving the console.
const OPERATOR_ID: i64 = 0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let urls = ShardUrls::from_env()?;
    let db = Database::connect_with_config(&urls, PoolConfig::default()).await?;
    info!(subsystem = "admin", "Connected to both shards");

    let Database {
        primary,
        secondary,
        query,
        ..
    } = db;
    let index = FederatedIndex::new(Arc::new(primary), Arc::new(secondary), Arc::new(query));

    let admins = AdminList::from_env().with_admin(OPERATOR_ID);
    let mut console = AdminConsole::new(index, admins);

    // Auto-delete controls are wired only when a bot credential is present;
    // the index commands work either way.
    if let Ok(chat) = BotClient::from_env() {
        let config = SchedulerConfig::from_env();
        let toggle = config.enabled.clone();
        let delay = config.delay;
        let scheduler = Arc::new(DeletionScheduler::new(Arc::new(chat), config));
        console = console.with_autodelete(AutoDeleteControls {
            toggle,
            scheduler,
            delay,
        });
    }

    run_repl(console).await
}

async fn run_repl(console: AdminConsole) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"mediadex admin console, 'help' for commands, 'exit' to quit\n")
        .await?;

    loop {
        stdout.write_all(b"mediadex> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        let reply = match console.handle(OPERATOR_ID, input).await {
            Ok(text) => text,
            Err(e) => format!("error: {e}"),
        };
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    Ok(())
}
