// In crates/engine/src/orchestrator.rs

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use api_client::{BacktestApi, BacktestDetail, SubmitRequest};
use app_config::ApiSettings;
use charts::ChartBackend;
use core_types::{BacktestResult, HistoryItem};
use events::{FileGroup, LoadPhase, RenderSummary, StatusLine, UiEvent, View};
use table::TradeFilter;
use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::files::refresh_files_once;
use crate::history::HistoryQuery;
use crate::normalize::{from_detail, from_historical};
use crate::session::Session;

pub const STATUS_SUBMITTING: &str = "Uploading and running backtest...";
pub const STATUS_LOADING_RESULTS: &str = "Backtest completed. Loading results...";
pub const STATUS_DONE: &str = "Done";
pub const STATUS_LOADING_HISTORICAL: &str = "Loading historical backtest...";

/// How often the run detail is re-fetched while the backend is still working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    /// A single fetch, no polling.
    fn default() -> Self {
        Self {
            attempts: 1,
            interval: Duration::ZERO,
        }
    }
}

impl From<&ApiSettings> for PollPolicy {
    fn from(settings: &ApiSettings) -> Self {
        Self {
            attempts: settings.poll_attempts.max(1),
            interval: Duration::from_millis(settings.poll_interval_ms),
        }
    }
}

/// How a load ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered(RenderSummary),
    /// The backend reported a status other than `completed`.
    Halted(String),
    Failed(String),
    /// A newer load started; this one was discarded.
    Superseded,
}

/// Drives a load from submission to rendered charts.
pub struct Orchestrator<B> {
    api: Arc<dyn BacktestApi>,
    session: Arc<Mutex<Session<B>>>,
    events: broadcast::Sender<UiEvent>,
    poll: PollPolicy,
}

impl<B: ChartBackend> Orchestrator<B> {
    pub fn new(
        api: Arc<dyn BacktestApi>,
        session: Arc<Mutex<Session<B>>>,
        events: broadcast::Sender<UiEvent>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            api,
            session,
            events,
            poll,
        }
    }

    pub fn session(&self) -> Arc<Mutex<Session<B>>> {
        Arc::clone(&self.session)
    }

    pub fn api(&self) -> Arc<dyn BacktestApi> {
        Arc::clone(&self.api)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Uploads price data, runs the backtest and renders the result.
    ///
    /// Every path ends in a terminal phase with a visible status line, except
    /// when a newer load supersedes this one.
    pub async fn run_backtest(&self, request: SubmitRequest) -> LoadOutcome {
        let generation = self.begin(STATUS_SUBMITTING);
        tracing::info!(generation, file = %request.file_name, symbol = %request.symbol, "Starting backtest run.");

        match self.run_inner(generation, request).await {
            Ok(outcome) => outcome,
            Err(err) => self.fail(generation, err),
        }
    }

    async fn run_inner(&self, generation: u64, request: SubmitRequest) -> Result<LoadOutcome> {
        // --- 1. Submit ---
        if request.category.trim().is_empty() {
            return Err(Error::MissingInput("data category"));
        }
        if request.symbol.trim().is_empty() {
            return Err(Error::MissingInput("symbol"));
        }
        let id = self.api.submit_backtest(request).await?;

        if !self.advance(generation, LoadPhase::Fetching, STATUS_LOADING_RESULTS) {
            return Ok(LoadOutcome::Superseded);
        }
        tracing::info!(generation, id = %id, "Backtest acknowledged.");

        // --- 2. Fetch detail ---
        let detail = self.fetch_detail(&id).await?;
        if !detail.is_completed() {
            let status = detail.status.clone().unwrap_or_default();
            return Ok(self.halt(generation, status));
        }

        // --- 3. Normalize, derive, project, render ---
        let result = from_detail(&id, detail, self.api.base_url());
        Ok(self.render(generation, result, STATUS_DONE.to_string()))
    }

    /// Fetches the run detail, polling while the backend reports work in progress.
    async fn fetch_detail(&self, id: &str) -> Result<BacktestDetail> {
        let mut attempt = 1;
        loop {
            let detail = self.api.backtest_detail(id).await?;
            if !detail.is_in_progress() || attempt >= self.poll.attempts {
                return Ok(detail);
            }
            tracing::debug!(id = %id, attempt, status = ?detail.status, "Backtest still running; polling again.");
            attempt += 1;
            tokio::time::sleep(self.poll.interval).await;
        }
    }

    /// Loads a stored result by id and renders it.
    pub async fn load_historical(&self, id: &str) -> LoadOutcome {
        let generation = self.begin(STATUS_LOADING_HISTORICAL);
        self.with_current(generation, |session| session.set_phase(LoadPhase::Fetching));
        tracing::info!(generation, id = %id, "Loading historical backtest.");

        match self.api.historical_result(id).await {
            Ok(data) => {
                let name = data
                    .original_filename
                    .clone()
                    .unwrap_or_else(|| "Unknown File".to_string());
                let result = from_historical(id, data, self.api.base_url());
                self.render(generation, result, format!("Loaded: {}", name))
            }
            Err(err) => self.fail(generation, err.into()),
        }
    }

    /// Fetches the trades CSV of the current result into the trade table.
    ///
    /// Applies `filter` and resets to page one. Returns the number of matching
    /// rows. Without a CSV link nothing changes.
    pub async fn load_trades_table(&self, filter: TradeFilter) -> Result<usize> {
        let (generation, link) = {
            let session = self.lock();
            let link = session.result().and_then(|r| r.downloads.trades_csv.clone());
            (session.generation(), link)
        };
        let Some(url) = link else {
            self.status(StatusLine::warn(Error::NoTradesCsv.to_string()));
            return Ok(0);
        };

        let loaded = async {
            let text = self.api.fetch_text(&url).await?;
            Ok::<_, Error>(ingest::trades_from_csv(&text)?)
        }
        .await;

        let table = match loaded {
            Ok(table) => table,
            Err(err) => {
                self.status(StatusLine::error(format!("Error: {}", err)));
                return Err(err);
            }
        };

        let rows = table.len();
        let matched = self.with_current(generation, |session| {
            session.set_table_source(table, filter);
            session.table_page().matched
        });
        match matched {
            Some(matched) => {
                tracing::info!(rows, matched, "Trades table loaded from CSV.");
                Ok(matched)
            }
            None => {
                tracing::debug!(generation, "Discarding trades CSV for a superseded result.");
                Ok(0)
            }
        }
    }

    /// Lists stored results, filtered and sorted by `query`.
    pub async fn list_history(&self, limit: usize, query: &HistoryQuery) -> Result<Vec<HistoryItem>> {
        match self.api.list_historical(limit).await {
            Ok(items) => {
                self.lock().set_view(View::History);
                self.emit(UiEvent::ViewChanged(View::History));
                Ok(query.apply(items))
            }
            Err(err) => {
                self.status(StatusLine::error(format!("Error loading data: {}", err)));
                Err(err.into())
            }
        }
    }

    /// Fetches the uploaded-file list once, grouped by category.
    pub async fn list_files(&self, category: Option<&str>) -> Result<Vec<FileGroup>> {
        refresh_files_once(self.api.as_ref(), category, &self.events).await
    }

    // --- Internal helpers ---

    fn lock(&self) -> MutexGuard<'_, Session<B>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: UiEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn status(&self, line: StatusLine) {
        self.emit(UiEvent::Status(line));
    }

    /// Runs `f` on the session only if `generation` is still current.
    fn with_current<R>(&self, generation: u64, f: impl FnOnce(&mut Session<B>) -> R) -> Option<R> {
        let mut session = self.lock();
        if !session.is_current(generation) {
            return None;
        }
        Some(f(&mut session))
    }

    fn begin(&self, message: &str) -> u64 {
        let generation = self.lock().begin_load();
        self.emit(UiEvent::PhaseChanged {
            generation,
            phase: LoadPhase::Submitting,
        });
        self.status(StatusLine::info(message));
        generation
    }

    /// Moves a current load to `phase`. Returns false if it was superseded.
    fn advance(&self, generation: u64, phase: LoadPhase, message: &str) -> bool {
        let advanced = self
            .with_current(generation, |session| session.set_phase(phase.clone()))
            .is_some();
        if advanced {
            self.emit(UiEvent::PhaseChanged { generation, phase });
            self.status(StatusLine::info(message));
        }
        advanced
    }

    fn halt(&self, generation: u64, status: String) -> LoadOutcome {
        let message = format!("Status: {}", status);
        if !self.advance(generation, LoadPhase::Halted(status.clone()), &message) {
            return LoadOutcome::Superseded;
        }
        tracing::info!(generation, status = %status, "Backtest not completed; halting.");
        LoadOutcome::Halted(status)
    }

    fn fail(&self, generation: u64, err: Error) -> LoadOutcome {
        let message = format!("Error: {}", err);
        if !self.advance(generation, LoadPhase::Failed(err.to_string()), &message) {
            tracing::debug!(generation, error = %err, "Superseded load failed; ignoring.");
            return LoadOutcome::Superseded;
        }
        tracing::error!(generation, error = %err, "Load failed.");
        LoadOutcome::Failed(err.to_string())
    }

    /// Installs `result` if `generation` is still current, then announces it.
    fn render(&self, generation: u64, result: BacktestResult, done: String) -> LoadOutcome {
        let id = result.id.clone();
        let source_name = result.source_name.clone();
        let trades = result.trades.len();

        let Some(report) = self.with_current(generation, |session| session.install(result)) else {
            tracing::info!(generation, "A newer load started; discarding this result.");
            return LoadOutcome::Superseded;
        };

        for (kind, reason) in &report.skipped {
            self.emit(UiEvent::ChartSkipped {
                kind: *kind,
                reason: reason.clone(),
            });
        }

        let summary = RenderSummary {
            generation,
            id,
            source_name,
            rendered: report.rendered,
            skipped: report.skipped.into_iter().map(|(kind, _)| kind).collect(),
            empty: report.empty,
            trades,
        };
        tracing::info!(
            generation,
            rendered = summary.rendered.len(),
            skipped = summary.skipped.len(),
            trades,
            "Results rendered."
        );

        self.emit(UiEvent::PhaseChanged {
            generation,
            phase: LoadPhase::Ready,
        });
        self.emit(UiEvent::ResultsReady(summary.clone()));
        self.emit(UiEvent::ViewChanged(View::Results));
        self.status(StatusLine::info(done));
        LoadOutcome::Rendered(summary)
    }
}
