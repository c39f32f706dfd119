// In crates/charts/src/style.rs

use serde::Serialize;

use crate::color::Color;
use crate::kind::{ChartKind, ChartType};
use crate::projection::{ChartData, Coloring, Dataset};
use crate::theme::{SeriesRole, Theme, ThemeMode};

/// A colour for the whole dataset, or one per point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Uniform(Color),
    PerPoint(Vec<Color>),
}

impl Paint {
    /// The colour of point `index`.
    pub fn at(&self, index: usize) -> Option<Color> {
        match self {
            Paint::Uniform(color) => Some(*color),
            Paint::PerPoint(colors) => colors.get(index).copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStyle {
    pub label: String,
    pub border: Paint,
    pub fill: Paint,
    pub border_width: u8,
    /// Line charts shade the area under the curve.
    pub fill_area: bool,
    pub tension: f32,
}

/// Mode-dependent decoration around the plotted data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chrome {
    pub tooltip_background: Color,
    pub tooltip_text: Color,
    pub tooltip_border: Color,
    pub grid: Color,
    pub ticks: Color,
    pub legend_text: Color,
    pub crosshair: Color,
    pub show_legend: bool,
    pub y_axis_label: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    pub kind: ChartKind,
    pub mode: ThemeMode,
    pub title: &'static str,
    pub chart_type: ChartType,
    pub datasets: Vec<DatasetStyle>,
    pub chrome: Chrome,
}

/// Resolves the colour rules of `data` against the theme for `mode`.
///
/// Pure: calling it again with another mode re-colours a chart without
/// touching its labels or values.
pub fn style(data: &ChartData, mode: ThemeMode) -> ChartStyle {
    let theme = Theme::for_mode(mode);
    let kind = data.kind;
    let chart_type = kind.chart_type();

    let datasets = data
        .datasets
        .iter()
        .map(|dataset| dataset_style(&theme, chart_type, dataset))
        .collect();

    ChartStyle {
        kind,
        mode,
        title: kind.title(),
        chart_type,
        datasets,
        chrome: Chrome {
            tooltip_background: theme.tooltip_background,
            tooltip_text: theme.tooltip_text,
            tooltip_border: theme.tooltip_border,
            grid: theme.grid,
            ticks: theme.ticks,
            legend_text: theme.legend_text,
            crosshair: theme.crosshair,
            show_legend: chart_type == ChartType::Doughnut,
            y_axis_label: kind.y_axis_label(),
        },
    }
}

fn dataset_style(theme: &Theme, chart_type: ChartType, dataset: &Dataset) -> DatasetStyle {
    let (border, fill) = match &dataset.coloring {
        Coloring::Series(role) => {
            let colors = theme.series(*role);
            (Paint::Uniform(colors.border), Paint::Uniform(colors.fill))
        }
        Coloring::BySign => {
            let roles: Vec<SeriesRole> = dataset
                .values
                .iter()
                .map(|v| {
                    if *v >= 0.0 {
                        SeriesRole::Positive
                    } else {
                        SeriesRole::Negative
                    }
                })
                .collect();
            per_point(theme, &roles)
        }
        Coloring::ByCategory(roles) => per_point(theme, roles),
    };

    let (border_width, fill_area, tension) = match chart_type {
        ChartType::Line => (2, true, 0.4),
        ChartType::Bar => (1, false, 0.0),
        ChartType::Doughnut => (2, false, 0.0),
    };

    DatasetStyle {
        label: dataset.label.clone(),
        border,
        fill,
        border_width,
        fill_area,
        tension,
    }
}

fn per_point(theme: &Theme, roles: &[SeriesRole]) -> (Paint, Paint) {
    let (borders, fills) = roles
        .iter()
        .map(|role| {
            let colors = theme.series(*role);
            (colors.border, colors.fill)
        })
        .unzip();
    (Paint::PerPoint(borders), Paint::PerPoint(fills))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project_monthly;
    use analytics::LabeledSeries;
    use rust_decimal_macros::dec;

    fn monthly() -> ChartData {
        project_monthly(&LabeledSeries {
            labels: vec!["Jan".into(), "Feb".into(), "Mar".into()],
            values: vec![dec!(10), dec!(0), dec!(-2)],
        })
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_by_sign_resolves_per_bar() {
        let styled = style(&monthly(), ThemeMode::Dark);
        let fill = &styled.datasets[0].fill;

        assert_eq!(fill.at(0).map(|c| c.to_string()).as_deref(), Some("rgba(34, 197, 94, 0.8)"));
        assert_eq!(fill.at(1).map(|c| c.to_string()).as_deref(), Some("rgba(34, 197, 94, 0.8)"));
        assert_eq!(fill.at(2).map(|c| c.to_string()).as_deref(), Some("rgba(239, 68, 68, 0.8)"));
        assert_eq!(styled.chrome.y_axis_label, Some("P&L ($)"));
        assert!(!styled.chrome.show_legend);
    }

    #[test]
    fn test_mode_changes_chrome_only() {
        let data = monthly();
        let dark = style(&data, ThemeMode::Dark);
        let light = style(&data, ThemeMode::Light);

        assert_eq!(dark.datasets, light.datasets);
        assert_ne!(dark.chrome.tooltip_background, light.chrome.tooltip_background);
        assert_eq!(light.chrome.tooltip_text.to_string(), "#0f172a");
    }
}
