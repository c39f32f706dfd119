// In app/src/render.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use charts::format::{distribution_tooltip, format_amount, tooltip_label};
use charts::{ChartBackend, ChartData, ChartHandle, ChartKind, ChartStyle, ChartType, RenderError};
use serde::Serialize;

/// Prints a one-line summary of every chart to stdout.
#[derive(Debug, Default)]
pub struct TerminalBackend {
    next: u64,
}

impl ChartBackend for TerminalBackend {
    fn create(
        &mut self,
        _viewport: &str,
        data: &ChartData,
        style: &ChartStyle,
    ) -> Result<ChartHandle, RenderError> {
        self.next += 1;
        println!("{}", summarize(data, style));
        Ok(ChartHandle(self.next))
    }

    fn destroy(&mut self, _handle: ChartHandle) {}
}

/// Condenses a chart into one line: title, type, the range of its values and
/// the tooltip of its last point.
pub fn summarize(data: &ChartData, style: &ChartStyle) -> String {
    let head = format!("{} ({})", style.title, type_name(style.chart_type));

    let Some(dataset) = data.datasets.first() else {
        return format!("{}: no data", head);
    };

    if data.kind == ChartKind::Distribution {
        let counts: Vec<usize> = dataset.values.iter().map(|v| *v as usize).collect();
        let total = counts.iter().sum();
        let wedges: Vec<String> = data
            .labels
            .iter()
            .zip(&counts)
            .map(|(label, count)| distribution_tooltip(label, *count, total))
            .collect();
        return format!("{}: {}", head, wedges.join(", "));
    }

    let values = &dataset.values;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let last = values.last().copied().unwrap_or_default();
    let last_label = data.labels.last().map(String::as_str).unwrap_or_default();
    format!(
        "{}: {} points, min {}, max {}, last {} {}",
        head,
        values.len(),
        format_amount(min),
        format_amount(max),
        last_label,
        tooltip_label(&dataset.label, last)
    )
}

fn type_name(chart_type: ChartType) -> &'static str {
    match chart_type {
        ChartType::Line => "line",
        ChartType::Bar => "bar",
        ChartType::Doughnut => "doughnut",
    }
}

#[derive(Serialize)]
struct ChartExport<'a> {
    viewport: &'a str,
    data: &'a ChartData,
    style: &'a ChartStyle,
}

/// Writes each chart as `{viewport}.json` into a directory.
///
/// Destroying a chart removes its file, so the directory always mirrors what
/// is mounted.
#[derive(Debug)]
pub struct JsonExportBackend {
    dir: PathBuf,
    next: u64,
    files: BTreeMap<ChartHandle, PathBuf>,
}

impl JsonExportBackend {
    /// Creates `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            next: 0,
            files: BTreeMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartBackend for JsonExportBackend {
    fn create(
        &mut self,
        viewport: &str,
        data: &ChartData,
        style: &ChartStyle,
    ) -> Result<ChartHandle, RenderError> {
        let backend_error = |message: String| RenderError::Backend {
            viewport: viewport.to_string(),
            message,
        };

        let export = ChartExport {
            viewport,
            data,
            style,
        };
        let json = serde_json::to_vec_pretty(&export).map_err(|e| backend_error(e.to_string()))?;
        let path = self.dir.join(format!("{}.json", viewport));
        fs::write(&path, json).map_err(|e| backend_error(e.to_string()))?;

        self.next += 1;
        let handle = ChartHandle(self.next);
        tracing::debug!(viewport, path = %path.display(), "Chart exported.");
        self.files.insert(handle, path);
        Ok(handle)
    }

    fn destroy(&mut self, handle: ChartHandle) {
        if let Some(path) = self.files.remove(&handle) {
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "Failed to remove exported chart.");
            }
        }
    }
}
