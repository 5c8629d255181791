/// Events flowing through the application event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A dispatched question resolved with an answer.
    AnswerReceived(String),
    /// A dispatched question failed (transport, status, or decode).
    AskFailed(String),
    /// Notification to display in the overlay.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions produced by the global input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ShowHelp,
    CloseHelp,
    ClearTranscript,
    Quit,
}

/// Severity of an overlay notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn symbol(self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        use super::theme;
        match self {
            NotificationLevel::Info => theme::INFO,
            NotificationLevel::Success => theme::SUCCESS,
            NotificationLevel::Warning => theme::WARNING,
            NotificationLevel::Error => theme::ERROR,
        }
    }
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
