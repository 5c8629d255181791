use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, Notification, NotificationLevel};
use super::services::Services;
use super::theme;
use super::views::chat::{ChatInputMode, ChatState};

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Chat view state.
    pub chat: ChatState,
    /// Whether the help modal is visible.
    pub show_help: bool,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Receiver side of the application event channel.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Shared services handed to input handlers.
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        Self {
            running: true,
            chat: ChatState::new(),
            show_help: false,
            notifications: Vec::new(),
            notification_counter: 0,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            // Render
            terminal.draw(|frame| self.render(frame))?;

            // Select next event
            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Help modal consumes all input when open
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Chat view
                if self.chat.handle_input(&crossterm_event, &self.services) {
                    return;
                }

                // Priority 3: Global keybindings
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Tick => self.on_tick(),
            AppEvent::AnswerReceived(answer) => {
                self.chat.on_answer(answer);
            }
            AppEvent::AskFailed(error) => {
                self.push_notification("Request failed".to_string(), NotificationLevel::Error);
                self.chat.on_ask_failed(&error);
            }
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        // Global keybindings (active when the chat view doesn't consume)
        match (modifiers, code) {
            // Ctrl+C → quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            // Ctrl+L → clear transcript
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(Action::ClearTranscript),
            // No modifiers
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::ClearTranscript => self.chat.cmd_clear(),
        }
    }

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        if self.notifications.len() >= 3 {
            self.notifications.remove(0);
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 100,
        });
    }

    /// Tick: decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        self.notifications.retain_mut(|n| {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
            n.ttl_ticks > 0
        });
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Chat view
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.chat.render(frame, chunks[0]);
        self.render_status_bar(frame, chunks[1]);

        // Overlays
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let backend_status = if self.chat.pending() > 0 {
            Span::styled(
                format!("{} pending", self.chat.pending()),
                Style::default().fg(theme::PRIMARY_LIGHT),
            )
        } else {
            Span::styled("ready", Style::default().fg(theme::TEXT_MUTED))
        };

        let mode_indicator = match self.chat.input_mode() {
            ChatInputMode::Insert => Span::styled(" INSERT ", theme::insert_badge()),
            ChatInputMode::Normal => Span::raw(""),
        };

        let status = Line::from(vec![
            Span::styled(" askdoc ", theme::brand_badge()),
            Span::raw(" "),
            mode_indicator,
            Span::raw(" "),
            Span::styled(
                self.services.backend.base_url(),
                Style::default().fg(theme::TEXT_DIM),
            ),
            Span::raw(" │ "),
            backend_status,
            Span::raw(" │ "),
            Span::styled("i", theme::key_hint()),
            Span::raw(":ask "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", n.level.symbol()),
                        Style::default()
                            .fg(n.level.color())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(&n.message),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 70, area);

        let heading = |text: &'static str| {
            Line::from(Span::styled(
                text,
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ))
        };
        let row = |binding: &'static str, action: &'static str| {
            Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{binding:<18}"),
                    Style::default()
                        .fg(theme::PRIMARY_LIGHT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(action),
            ])
        };

        let lines = vec![
            Line::raw(""),
            heading(" Keybindings"),
            Line::raw(""),
            heading("  Global"),
            row("q", "Quit application"),
            row("?", "Toggle this help"),
            row("Ctrl+L", "Clear transcript"),
            row("Ctrl+C", "Force quit"),
            Line::raw(""),
            heading("  Chat"),
            row("i / Enter / a", "Enter insert mode"),
            row("Esc", "Exit insert mode"),
            row("j/k", "Scroll messages"),
            row("G / g", "Jump to bottom / top"),
            row("PageUp/PageDown", "Scroll by page"),
            row("/clear", "Clear messages"),
            row("/help", "List commands"),
            Line::raw(""),
            Line::styled(
                "  Press ? or Esc to close",
                Style::default().fg(theme::TEXT_MUTED),
            ),
        ];

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Rect centered in `area`, sized as a percentage of it.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
