//! Command-line front end for the table manager.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use table_manager::TableManagerSettings;
use table_manager::domain::{
    DeleteOutcome, EntityKind, LOG_COLUMNS, RefreshOutcome, RowState, SimpleRow, TableManager,
    TableRows,
};
use table_manager::inbound::html::TableRenderer;
use table_manager::inbound::terminal::TerminalPrompt;
use table_manager::outbound::http::HttpRecordsApi;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

type CliManager = TableManager<HttpRecordsApi, TerminalPrompt<io::BufReader<io::Stdin>, io::Stderr>>;

/// `table-manager` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "table-manager",
    about = "List and edit lookup tables and correct movement logs",
    version
)]
struct CliArgs {
    /// Backend root URL. Falls back to `TABLE_MANAGER_BASE_URL`.
    #[arg(long = "base-url", value_name = "url", global = true)]
    base_url: Option<Url>,
    /// Request timeout in seconds. Falls back to
    /// `TABLE_MANAGER_REQUEST_TIMEOUT_SECS`.
    #[arg(long = "timeout-secs", value_name = "seconds", global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every record of a kind.
    List {
        /// Entity kind; defaults to the configured initial kind.
        kind: Option<EntityKind>,
    },
    /// Create a simple record.
    Add {
        /// Simple entity kind.
        kind: EntityKind,
        /// Name of the new record.
        name: String,
    },
    /// Rename a simple record.
    Rename {
        /// Simple entity kind.
        kind: EntityKind,
        /// Record identifier.
        id: i64,
        /// New name.
        name: String,
    },
    /// Delete a simple record after confirmation.
    Delete {
        /// Simple entity kind.
        kind: EntityKind,
        /// Record identifier.
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Submit a new ending value for one movement-log row.
    Correct {
        /// Movement-log kind.
        kind: EntityKind,
        /// Log identifier of the row.
        log_id: i64,
        /// Entity identifier of the row.
        entity_id: i64,
        /// New ending value.
        value: String,
    },
    /// Print the kind selector and table as HTML.
    Render {
        /// Entity kind; defaults to the configured initial kind.
        kind: Option<EntityKind>,
    },
}

impl Command {
    const fn assume_yes(&self) -> bool {
        matches!(self, Self::Delete { yes: true, .. })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let settings = TableManagerSettings::load_without_cli("table-manager")?;
    let base_url = match args.base_url {
        Some(url) => url,
        None => settings.base_url()?,
    };
    let timeout = match timeout_override(args.timeout_secs)? {
        Some(timeout) => timeout,
        None => settings.request_timeout()?,
    };
    let initial_kind = settings.initial_kind()?;

    let api = HttpRecordsApi::new(base_url.clone(), timeout)?;
    let prompt = TerminalPrompt::stdio(args.command.assume_yes());
    let manager: CliManager = TableManager::new(Arc::new(api), Arc::new(prompt), initial_kind);
    info!(%base_url, kind = %initial_kind, "table manager started");

    match args.command {
        Command::List { kind } => {
            load(&manager, kind.unwrap_or(initial_kind)).await?;
            print_rows(&manager)
        }
        Command::Add { kind, name } => {
            load(&manager, kind).await?;
            manager.begin_add()?;
            manager.save_new(&name).await?;
            print_rows(&manager)
        }
        Command::Rename { kind, id, name } => {
            load(&manager, kind).await?;
            manager.begin_edit(id)?;
            manager.save_edit(id, &name).await?;
            print_rows(&manager)
        }
        Command::Delete { kind, id, .. } => {
            load(&manager, kind).await?;
            match manager.delete_record(id).await? {
                DeleteOutcome::Deleted => print_rows(&manager),
                DeleteOutcome::Declined => Ok(()),
            }
        }
        Command::Correct {
            kind,
            log_id,
            entity_id,
            value,
        } => {
            load(&manager, kind).await?;
            let dialog = manager.open_correction(log_id, entity_id)?;
            let summary = &dialog.summary;
            write_line(&format!(
                "{} {} {}: opening {} closing {} movement {}",
                summary.date,
                summary.mill_name,
                summary.name,
                summary.opening_balance,
                summary.closing_balance,
                summary.movement
            ))?;
            manager.submit_correction(&value).await?;
            print_rows(&manager)
        }
        Command::Render { kind } => {
            load(&manager, kind.unwrap_or(initial_kind)).await?;
            let renderer = TableRenderer::new()?;
            write_line(&renderer.render_kind_selector(manager.current_kind())?)?;
            write_line(&renderer.render_table(&manager.view())?)
        }
    }
}

fn timeout_override(secs: Option<u64>) -> Result<Option<Duration>> {
    match secs {
        Some(0) => Err(eyre!("--timeout-secs must be at least 1")),
        Some(secs) => Ok(Some(Duration::from_secs(secs))),
        None => Ok(None),
    }
}

async fn load(manager: &CliManager, kind: EntityKind) -> Result<()> {
    match manager.select_entity_kind(kind).await {
        RefreshOutcome::Rendered { .. } | RefreshOutcome::Discarded => Ok(()),
        RefreshOutcome::Failed(error) => {
            Err(error).wrap_err_with(|| format!("failed to load {kind} records"))
        }
    }
}

fn print_rows(manager: &CliManager) -> Result<()> {
    let view = manager.view();
    match view.rows() {
        TableRows::Simple(rows) => {
            write_line("Id\tName")?;
            for SimpleRow { id, state } in rows {
                let name = match state {
                    RowState::Display { name } => name,
                    RowState::Edit { original_name, .. } => original_name,
                };
                write_line(&format!("{id}\t{name}"))?;
            }
        }
        TableRows::MovementLog(rows) => {
            let mut header = LOG_COLUMNS.to_vec();
            header.pop();
            header.push("Log/Id");
            write_line(&header.join("\t"))?;
            for row in rows {
                write_line(&format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}/{}",
                    row.date,
                    row.mill_name,
                    row.shift,
                    row.miller,
                    row.name,
                    row.opening_balance,
                    row.closing_balance,
                    row.movement,
                    row.log_id,
                    row.id
                ))?;
            }
        }
    }
    Ok(())
}

fn write_line(line: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").wrap_err("write to stdout")
}
