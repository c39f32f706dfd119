// In crates/engine/src/session.rs

use analytics::{AnalyticsEngine, DerivedSeries};
use charts::{
    ChartBackend, ChartKind, ChartRegistry, MetricTile, RenderError, TableProjection, ThemeMode,
    metric_tiles, project, project_table,
};
use core_types::{BacktestResult, TradeTable};
use events::{LoadPhase, View};
use table::{PageView, TablePage, TradeFilter};

/// What happened to each chart when a result was installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub rendered: Vec<ChartKind>,
    /// Charts that failed to project or render, with the reason.
    pub skipped: Vec<(ChartKind, String)>,
    /// Charts with no data to draw.
    pub empty: Vec<ChartKind>,
}

/// All state behind one results view.
///
/// Owned by the orchestrator behind a mutex and passed around explicitly.
pub struct Session<B> {
    generation: u64,
    phase: LoadPhase,
    view: View,
    result: Option<BacktestResult>,
    derived: DerivedSeries,
    table: TradeTable,
    page_view: PageView,
    tiles: Vec<MetricTile>,
    charts: ChartRegistry<B>,
    analytics: AnalyticsEngine,
}

impl<B: ChartBackend> Session<B> {
    pub fn new(backend: B, mode: ThemeMode) -> Self {
        Self {
            generation: 0,
            phase: LoadPhase::Idle,
            view: View::Home,
            result: None,
            derived: DerivedSeries::default(),
            table: TradeTable::default(),
            page_view: PageView::new(),
            tiles: Vec::new(),
            charts: ChartRegistry::new(backend, mode),
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Starts a new load and returns its generation token.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.phase = LoadPhase::Submitting;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `generation` is still the most recent load.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn set_phase(&mut self, phase: LoadPhase) {
        if !self.phase.can_advance_to(&phase) {
            tracing::warn!(from = ?self.phase, to = ?phase, "Unexpected load phase transition.");
        }
        self.phase = phase;
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Replaces the current result and renders it.
    ///
    /// Order is fixed: derive, project and mount each chart, then tiles and
    /// the trade table, and only then switch to the results view. A chart that
    /// fails is skipped without affecting the others.
    pub fn install(&mut self, result: BacktestResult) -> RenderReport {
        self.charts.clear();
        self.derived = self.analytics.derive(&result);

        let mut report = RenderReport::default();
        for kind in ChartKind::ALL {
            match project(kind, &result, &self.derived) {
                Ok(Some(data)) => match self.charts.mount(data) {
                    Ok(_) => report.rendered.push(kind),
                    Err(err) => {
                        tracing::warn!(chart = %kind, error = %err, "Chart render failed; skipping.");
                        report.skipped.push((kind, err.to_string()));
                    }
                },
                Ok(None) => {
                    tracing::debug!(chart = %kind, "No data; chart not rendered.");
                    report.empty.push(kind);
                }
                Err(err) => {
                    tracing::warn!(chart = %kind, error = %err, "Chart projection failed; skipping.");
                    report.skipped.push((kind, err.to_string()));
                }
            }
        }

        self.tiles = metric_tiles(&result.metrics);
        self.table = result.trades.clone();
        self.page_view = PageView::new();
        self.result = Some(result);
        self.view = View::Results;
        self.phase = LoadPhase::Ready;
        report
    }

    pub fn result(&self) -> Option<&BacktestResult> {
        self.result.as_ref()
    }

    pub fn derived(&self) -> &DerivedSeries {
        &self.derived
    }

    pub fn tiles(&self) -> &[MetricTile] {
        &self.tiles
    }

    pub fn charts(&self) -> &ChartRegistry<B> {
        &self.charts
    }

    // --- Trade table ---

    /// Swaps the rows behind the trade table and applies `filter` from page one.
    pub fn set_table_source(&mut self, table: TradeTable, filter: TradeFilter) {
        self.table = table;
        self.page_view.set_filter(filter);
    }

    pub fn table(&self) -> &TradeTable {
        &self.table
    }

    pub fn page_view(&self) -> &PageView {
        &self.page_view
    }

    pub fn set_filter(&mut self, filter: TradeFilter) {
        self.page_view.set_filter(filter);
    }

    pub fn next_page(&mut self) {
        self.page_view.next(&self.table);
    }

    pub fn prev_page(&mut self) {
        self.page_view.prev();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page_view.go_to(page, &self.table);
    }

    pub fn table_page(&self) -> TablePage<'_> {
        self.page_view.current(&self.table)
    }

    pub fn table_projection(&self) -> TableProjection {
        project_table(&self.table, &self.table_page())
    }

    // --- Theme ---

    pub fn theme(&self) -> ThemeMode {
        self.charts.mode()
    }

    /// Re-styles every mounted chart. Projection and derivation are not re-run.
    pub fn set_theme(&mut self, mode: ThemeMode) -> Vec<(ChartKind, RenderError)> {
        self.charts.retheme(mode)
    }

    pub fn toggle_theme(&mut self) -> Vec<(ChartKind, RenderError)> {
        let next = self.theme().toggle();
        self.set_theme(next)
    }

    pub fn reset_zoom(&mut self, kind: ChartKind) -> bool {
        self.charts.reset_zoom(kind)
    }
}
