// --- UI Event Structures ---

use chrono::{DateTime, Utc};
use charts::ChartKind;
use core_types::UploadedFile;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

/// One line of the status bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLine {
    pub timestamp: DateTime<Utc>,
    pub level: StatusLevel,
    pub message: String,
}

impl StatusLine {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, message)
    }

    fn new(level: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }
}

/// Where a single load is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum LoadPhase {
    Idle,
    Submitting,
    Fetching,
    Ready,
    /// The backend reported a status other than `completed`.
    Halted(String),
    Failed(String),
}

impl LoadPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadPhase::Ready | LoadPhase::Halted(_) | LoadPhase::Failed(_))
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Any phase may fail. Otherwise a finished load can only be followed by a new submission.
    pub fn can_advance_to(&self, next: &LoadPhase) -> bool {
        use LoadPhase::*;
        match (self, next) {
            (_, Failed(_)) => true,
            (Idle | Ready | Halted(_) | Failed(_), Submitting) => true,
            (Submitting, Fetching) => true,
            (Submitting | Fetching, Ready | Halted(_)) => true,
            _ => false,
        }
    }
}

/// The section of the client currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    History,
    Results,
}

/// Uploaded files sharing a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileGroup {
    pub category: String,
    pub files: Vec<UploadedFile>,
}

/// What a finished load put on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub generation: u64,
    pub id: Option<String>,
    pub source_name: Option<String>,
    pub rendered: Vec<ChartKind>,
    pub skipped: Vec<ChartKind>,
    pub empty: Vec<ChartKind>,
    pub trades: usize,
}

/// The top-level UI event enum.
/// `tag` and `content` are used by serde for clean JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum UiEvent {
    Status(StatusLine),
    PhaseChanged { generation: u64, phase: LoadPhase },
    ChartSkipped { kind: ChartKind, reason: String },
    ResultsReady(RenderSummary),
    ViewChanged(View),
    FileList(Vec<FileGroup>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert!(LoadPhase::Idle.can_advance_to(&LoadPhase::Submitting));
        assert!(LoadPhase::Submitting.can_advance_to(&LoadPhase::Fetching));
        assert!(LoadPhase::Fetching.can_advance_to(&LoadPhase::Halted("running".into())));
        assert!(LoadPhase::Fetching.can_advance_to(&LoadPhase::Failed("timeout".into())));
        assert!(LoadPhase::Ready.can_advance_to(&LoadPhase::Submitting));
        assert!(!LoadPhase::Idle.can_advance_to(&LoadPhase::Ready));
        assert!(!LoadPhase::Ready.can_advance_to(&LoadPhase::Fetching));
        assert!(LoadPhase::Halted("queued".into()).is_terminal());
        assert!(!LoadPhase::Fetching.is_terminal());
    }

    #[test]
    fn test_event_json_shape() {
        let event = UiEvent::ViewChanged(View::Results);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"type": "ViewChanged", "payload": "results"}));
    }
}
