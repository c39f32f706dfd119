// In app/src/output.rs

use std::io::IsTerminal;

use charts::{MetricTile, TableProjection, Theme, ThemeMode, Tone};
use core_types::{DownloadLinks, HistoryItem};
use engine::HistoryCard;
use events::{FileGroup, StatusLevel, UiEvent};
use ingest::{UploadPreview, format_bytes};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

fn marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "+",
        Tone::Negative => "-",
        Tone::Neutral => " ",
    }
}

/// Colours toned text with the active theme when stdout is a terminal.
pub struct Palette {
    theme: Theme,
    ansi: bool,
}

impl Palette {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            theme: Theme::for_mode(mode),
            ansi: std::io::stdout().is_terminal(),
        }
    }

    fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.ansi {
            return text.to_string();
        }
        let color = self.theme.tone_color(tone);
        format!("\x1b[38;2;{};{};{}m{}\x1b[0m", color.r, color.g, color.b, text)
    }
}

/// `+100` / `-40` so the sign survives without colour.
fn signed(tone: Tone, text: &str) -> String {
    format!("{}{}", marker(tone).trim(), text.trim_start_matches('-'))
}

/// Prints status lines, skipped charts and file lists as they arrive.
///
/// The task ends once every sender of the channel is dropped.
pub fn spawn_event_printer(mut rx: broadcast::Receiver<UiEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Event printer fell behind.");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn print_event(event: &UiEvent) {
    match event {
        UiEvent::Status(line) => match line.level {
            StatusLevel::Info => println!("» {}", line.message),
            StatusLevel::Warn | StatusLevel::Error => eprintln!("» {}", line.message),
        },
        UiEvent::ChartSkipped { kind, reason } => {
            eprintln!("» {} was not rendered: {}", kind, reason);
        }
        UiEvent::FileList(groups) => print_file_groups(groups),
        UiEvent::PhaseChanged { generation, phase } if phase.is_terminal() => {
            tracing::debug!(generation, ?phase, "Load finished.");
        }
        UiEvent::PhaseChanged { .. } | UiEvent::ResultsReady(_) | UiEvent::ViewChanged(_) => {}
    }
}

pub fn print_tiles(tiles: &[MetricTile], palette: &Palette) {
    println!();
    for tile in tiles {
        let value = format!("{:>14}", tile.value);
        println!(
            "{} {:<14} {}",
            marker(tile.tone),
            tile.label,
            palette.paint(tile.tone, &value)
        );
    }
}

pub fn print_table(projection: &TableProjection, palette: &Palette) {
    println!();
    if let Some(message) = projection.empty_message {
        println!("{}", message);
        return;
    }

    let mut widths: Vec<usize> = projection.header.iter().map(|h| h.chars().count()).collect();
    for row in &projection.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.text.chars().count() + 1);
        }
    }

    let header: Vec<String> = projection
        .header
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect();
    println!("{}", header.join("  "));

    for row in &projection.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| match cell.tone {
                // Pad before painting; escape codes have no width.
                Some(tone) => palette.paint(tone, &format!("{:<w$}", signed(tone, &cell.text), w = *w)),
                None => format!("{:<w$}", cell.text, w = *w),
            })
            .collect();
        println!("{}", cells.join("  "));
    }
    println!("{}", projection.page_label);
}

pub fn print_downloads(links: &DownloadLinks) {
    if let Some(url) = &links.trades_csv {
        println!("Trades CSV:  {}", url);
    }
    if let Some(url) = &links.metrics_csv {
        println!("Metrics CSV: {}", url);
    }
}

pub fn print_history(items: &[HistoryItem], palette: &Palette) {
    if items.is_empty() {
        println!("No backtest results found.");
        return;
    }

    for card in items.iter().map(HistoryCard::from) {
        println!("{}  [{}]", card.title, card.id);
        println!("  {}  ·  {}", card.subtitle, card.date);
        println!(
            "  P&L {}  Win rate {}  Sharpe {}  Max DD {}",
            palette.paint(card.pnl_tone, &signed(card.pnl_tone, &card.total_pnl)),
            card.win_rate,
            card.sharpe_ratio,
            card.max_drawdown
        );
    }
}

pub fn print_file_groups(groups: &[FileGroup]) {
    if groups.is_empty() {
        println!("No files uploaded yet.");
        return;
    }

    for group in groups {
        println!("{} ({})", group.category, group.files.len());
        for file in &group.files {
            println!(
                "  {:<32} {:<8} {:>10} rows  {:>8.2} MB  {}",
                file.filename,
                file.symbol.as_deref().unwrap_or("-"),
                file.row_count,
                file.size_mb,
                file.uploaded_at.as_deref().unwrap_or("")
            );
        }
    }
}

pub fn print_preview(preview: &UploadPreview) {
    println!("Size: {}", format_bytes(preview.size_bytes));
    println!("{}", preview.headers.join(", "));
    for row in &preview.rows {
        println!("{}", row.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_uses_theme_tone_colors() {
        let palette = Palette {
            theme: Theme::dark(),
            ansi: true,
        };
        assert_eq!(
            palette.paint(Tone::Negative, "-40"),
            "\x1b[38;2;239;68;68m-40\x1b[0m"
        );
        assert!(palette.paint(Tone::Positive, "+1").starts_with("\x1b[38;2;45;211;111m"));
    }

    #[test]
    fn test_plain_output_keeps_sign_markers() {
        let palette = Palette {
            theme: Theme::light(),
            ansi: false,
        };
        assert_eq!(palette.paint(Tone::Negative, &signed(Tone::Negative, "-40.00")), "-40.00");
        assert_eq!(signed(Tone::Positive, "100.00"), "+100.00");
        assert_eq!(signed(Tone::Neutral, "0.00"), "0.00");
    }
}
