// In app/src/main.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use api_client::{BacktestApi, HttpApiClient, SubmitRequest};
use app_config::Settings;
use charts::{ChartBackend, ThemeMode};
use clap::{Args, Parser, Subcommand};
use engine::{
    EVENT_CHANNEL_CAPACITY, HistoryQuery, HistorySort, LoadOutcome, Orchestrator, PollPolicy,
    Session, spawn_file_refresh,
};
use events::UiEvent;
use table::{OutcomeFilter, SideFilter, TradeFilter};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing_subscriber::prelude::*;

mod output;
mod render;

use crate::render::{JsonExportBackend, TerminalBackend};

type Backend = Box<dyn ChartBackend + Send>;
type SharedSession = Arc<Mutex<Session<Backend>>>;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Runs backtests on a remote backend and renders their results."
)]
struct Cli {
    /// Chart theme, `dark` or `light`. Overrides `ui.theme`.
    #[arg(long, global = true)]
    theme: Option<ThemeMode>,

    /// Write every rendered chart as JSON into this directory instead of
    /// printing a summary.
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Uploads a price-data CSV, runs a backtest and renders the result.
    Run {
        /// The CSV file with a date column plus open, high, low and close.
        file: PathBuf,

        /// Data category, e.g. "futures".
        #[arg(short, long)]
        category: String,

        /// The traded symbol, e.g. "ES".
        #[arg(short, long)]
        symbol: String,

        /// A TOML file of backtest parameter overrides.
        #[arg(long)]
        params: Option<PathBuf>,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Lists stored backtest results.
    History {
        /// Case-insensitive match on filename or strategy.
        #[arg(long, default_value = "")]
        search: String,

        /// newest, oldest, best or worst.
        #[arg(long, default_value = "newest")]
        sort: HistorySort,

        /// How many results to request. Defaults to `api.history_limit`.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Loads and renders a stored result.
    Show {
        id: String,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Shows the full trades CSV of a stored result.
    Trades {
        id: String,

        #[command(flatten)]
        table: TableArgs,
    },

    /// Lists uploaded price-data files by category.
    Files {
        #[arg(short, long)]
        category: Option<String>,

        /// Keep refreshing every `ui.file_refresh_secs` until interrupted.
        #[arg(long)]
        watch: bool,
    },

    /// Validates a price-data CSV locally without uploading it.
    Check { file: PathBuf },
}

#[derive(Args, Debug, Clone, Copy)]
struct TableArgs {
    /// long, short or both.
    #[arg(long, default_value = "both")]
    side: SideFilter,

    /// all, wins or losses.
    #[arg(long, default_value = "all")]
    outcome: OutcomeFilter,

    /// Trade table page, starting at 1.
    #[arg(long, default_value_t = 1)]
    page: usize,
}

impl TableArgs {
    fn filter(&self) -> TradeFilter {
        TradeFilter::new(self.side, self.outcome)
    }
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("Failed to load settings")?;
    init_tracing(&settings.app.log_level);

    tracing::info!(base_url = %settings.api.base_url, "Starting tradelens.");

    match cli.command {
        Commands::Run {
            ref file,
            ref category,
            ref symbol,
            ref params,
            table,
        } => {
            let request = build_request(&settings, file, category, symbol, params.as_deref()).await?;
            let client = Client::connect(&settings, &cli)?;
            let outcome = client.orchestrator.run_backtest(request).await;
            let session = client.finish().await?;
            report(outcome, &session, table)?;
        }
        Commands::History {
            ref search,
            sort,
            limit,
        } => {
            let palette = output::Palette::new(theme_mode(&settings, &cli)?);
            let client = Client::connect(&settings, &cli)?;
            let query = HistoryQuery {
                search: search.clone(),
                sort,
            };
            let items = client
                .orchestrator
                .list_history(limit.unwrap_or(settings.api.history_limit), &query)
                .await;
            client.finish().await?;
            output::print_history(&items?, &palette);
        }
        Commands::Show { ref id, table } => {
            let client = Client::connect(&settings, &cli)?;
            let outcome = client.orchestrator.load_historical(id).await;
            let session = client.finish().await?;
            report(outcome, &session, table)?;
        }
        Commands::Trades { ref id, table } => {
            handle_trades(&settings, &cli, id, table).await?;
        }
        Commands::Files {
            ref category,
            watch,
        } => {
            handle_files(&settings, &cli, category.clone(), watch).await?;
        }
        Commands::Check { ref file } => {
            let preview = ingest::inspect_upload(file, settings.ui.upload_max_bytes)?;
            output::print_preview(&preview);
            println!("{} is ready to upload.", file.display());
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::filter::Targets::new()
                .with_target("reqwest", tracing::Level::WARN)
                .with_target("hyper", tracing::Level::WARN)
                .with_default(level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();
}

// --- Wiring ---

/// An orchestrator plus the task printing its events.
struct Client {
    orchestrator: Orchestrator<Backend>,
    events: broadcast::Sender<UiEvent>,
    printer: JoinHandle<()>,
}

impl Client {
    fn connect(settings: &Settings, cli: &Cli) -> Result<Self> {
        let mode = theme_mode(settings, cli)?;
        let backend = chart_backend(cli.export_dir.as_deref())?;
        let api: Arc<dyn BacktestApi> = Arc::new(HttpApiClient::new(&settings.api)?);

        let (events, rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let printer = output::spawn_event_printer(rx);
        let session = Arc::new(Mutex::new(Session::new(backend, mode)));
        let orchestrator = Orchestrator::new(
            api,
            session,
            events.clone(),
            PollPolicy::from(&settings.api),
        );

        Ok(Self {
            orchestrator,
            events,
            printer,
        })
    }

    /// Closes the event channel, waits for pending output and hands back the session.
    async fn finish(self) -> Result<SharedSession> {
        let Client {
            orchestrator,
            events,
            printer,
        } = self;
        let session = orchestrator.session();
        drop(orchestrator);
        drop(events);
        printer.await?;
        Ok(session)
    }
}

/// `--theme` wins over `ui.theme`.
fn theme_mode(settings: &Settings, cli: &Cli) -> Result<ThemeMode> {
    Ok(match cli.theme {
        Some(mode) => mode,
        None => settings.ui.theme.parse()?,
    })
}

fn chart_backend(export_dir: Option<&Path>) -> Result<Backend> {
    Ok(match export_dir {
        Some(dir) => {
            let backend = JsonExportBackend::new(dir)
                .with_context(|| format!("Cannot create export directory {}", dir.display()))?;
            tracing::info!(dir = %dir.display(), "Exporting charts as JSON.");
            Box::new(backend)
        }
        None => Box::new(TerminalBackend::default()),
    })
}

/// Validates the upload locally and assembles the submit request.
async fn build_request(
    settings: &Settings,
    file: &Path,
    category: &str,
    symbol: &str,
    params: Option<&Path>,
) -> Result<SubmitRequest> {
    let preview = ingest::inspect_upload(file, settings.ui.upload_max_bytes)?;
    tracing::debug!(columns = preview.headers.len(), "Upload preview read.");

    let params = match params {
        Some(path) => app_config::load_params_file(path)
            .with_context(|| format!("Cannot read parameters from {}", path.display()))?,
        None => settings.backtest.clone(),
    };
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Not a file path: {}", file.display()))?;

    Ok(SubmitRequest {
        file_name,
        file_bytes: tokio::fs::read(file).await?,
        params,
        category: category.to_string(),
        symbol: symbol.to_string(),
    })
}

// --- Output ---

/// Prints a finished load. A failed load becomes the process error.
fn report(outcome: LoadOutcome, session: &SharedSession, table: TableArgs) -> Result<()> {
    match outcome {
        LoadOutcome::Rendered(_) => {
            let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
            session.set_filter(table.filter());
            session.go_to_page(table.page);

            let palette = output::Palette::new(session.theme());
            output::print_tiles(session.tiles(), &palette);
            output::print_table(&session.table_projection(), &palette);
            if let Some(result) = session.result() {
                output::print_downloads(&result.downloads);
            }
            Ok(())
        }
        LoadOutcome::Halted(_) | LoadOutcome::Superseded => Ok(()),
        LoadOutcome::Failed(reason) => Err(anyhow!(reason)),
    }
}

/// Loads a stored result, then replaces its trade rows with the full CSV.
async fn handle_trades(settings: &Settings, cli: &Cli, id: &str, table: TableArgs) -> Result<()> {
    let client = Client::connect(settings, cli)?;

    let outcome = client.orchestrator.load_historical(id).await;
    if let LoadOutcome::Failed(reason) = outcome {
        client.finish().await?;
        return Err(anyhow!(reason));
    }

    let loaded = client.orchestrator.load_trades_table(table.filter()).await;
    let session = client.finish().await?;
    let matched = loaded?;
    tracing::info!(matched, "Trades CSV loaded.");

    let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
    session.go_to_page(table.page);
    output::print_table(&session.table_projection(), &output::Palette::new(session.theme()));
    Ok(())
}

async fn handle_files(
    settings: &Settings,
    cli: &Cli,
    category: Option<String>,
    watch: bool,
) -> Result<()> {
    let client = Client::connect(settings, cli)?;

    if !watch {
        let listed = client.orchestrator.list_files(category.as_deref()).await;
        client.finish().await?;
        listed?;
        return Ok(());
    }

    let every = Duration::from_secs(settings.ui.file_refresh_secs.max(1));
    let refresh = spawn_file_refresh(client.orchestrator.api(), category, every, client.events.clone());
    tracing::info!(every_secs = every.as_secs(), "Watching uploaded files. Press Ctrl-C to stop.");

    tokio::signal::ctrl_c().await?;
    refresh.abort();
    // The aborted task drops its sender on the way out.
    let _ = refresh.await;
    client.finish().await?;
    Ok(())
}
