//! Chat view: question input, transcript rendering, and dispatch.
//!
//! Handles message display, input mode switching, slash commands, and
//! spawning one dispatch task per submitted question.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use super::super::theme;

use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::InputBuffer;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatInputMode {
    Normal,
    Insert,
}

/// Speaker role of one transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Local input.
    User,
    /// Server-provided answer.
    Ai,
    /// Failed dispatch surfaced inline.
    Error,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Ai => "AI",
            Role::Error => "Error",
        }
    }

    fn color(self) -> ratatui::style::Color {
        match self {
            Role::User => theme::SUCCESS,
            Role::Ai => theme::PRIMARY_LIGHT,
            Role::Error => theme::ERROR,
        }
    }
}

/// One rendered message turn, tagged by speaker role.
///
/// Content is rendered as plain terminal text; nothing in it is ever
/// interpreted as markup.
#[derive(Debug, Clone)]
pub struct TranscriptMessage {
    pub role: Role,
    pub content: String,
}

impl TranscriptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    fn header(&self) -> Line<'static> {
        Line::from(Span::styled(
            format!("── {} ──", self.role.label()),
            Style::default()
                .fg(self.role.color())
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn all_lines(&self) -> Vec<Line<'static>> {
        let mut out = vec![self.header()];
        if self.content.is_empty() {
            out.push(Line::raw(""));
        } else {
            let style = if self.role == Role::Error {
                Style::default().fg(theme::ERROR)
            } else {
                Style::default().fg(theme::TEXT)
            };
            for line in self.content.lines() {
                out.push(Line::styled(line.to_string(), style));
            }
        }
        out.push(Line::raw(""));
        out
    }
}

// ============================================================================
// Chat input rendering
// ============================================================================

fn render_chat_input(input: &InputBuffer, mode: ChatInputMode, pending: usize) -> Paragraph<'static> {
    let (border_color, title) = match mode {
        ChatInputMode::Insert => (theme::ACCENT, " Question (Esc to exit) "),
        ChatInputMode::Normal => (theme::TEXT_MUTED, " Question "),
    };

    let text = input.text();

    let display = if text.is_empty() {
        Line::styled(
            "Ask about your documents... (i to enter insert mode)",
            Style::default().fg(theme::TEXT_MUTED),
        )
    } else if mode == ChatInputMode::Insert {
        cursor_line(text, input.cursor_position())
    } else {
        Line::raw(text.to_string())
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    if pending > 0 {
        block = block.title_bottom(Line::styled(
            " waiting for answer... ",
            Style::default().fg(theme::PRIMARY_LIGHT),
        ));
    }

    Paragraph::new(display).block(block)
}

/// Input text with a block cursor at `cursor` (a char boundary).
fn cursor_line(text: &str, cursor: usize) -> Line<'static> {
    let (before, rest) = text.split_at(cursor);
    let (under, after) = match rest.chars().next() {
        Some(c) => rest.split_at(c.len_utf8()),
        None => (" ", ""),
    };
    Line::from(vec![
        Span::raw(before.to_string()),
        Span::styled(
            under.to_string(),
            Style::default().bg(theme::TEXT).fg(theme::BG_BASE),
        ),
        Span::raw(after.to_string()),
    ])
}

fn notify(services: &Services, level: NotificationLevel, message: String) {
    // Delivery failure means the app is shutting down; nothing to do
    let _ = services.event_tx.send(AppEvent::Notification(Notification {
        id: 0,
        message,
        level,
        ttl_ticks: 100,
    }));
}

// ============================================================================
// ChatState
// ============================================================================

pub struct ChatState {
    input_mode: ChatInputMode,
    input: InputBuffer,
    messages: Vec<TranscriptMessage>,
    scroll_offset: usize,
    auto_scroll: bool,
    /// Number of dispatches currently outstanding.
    pending: usize,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            input_mode: ChatInputMode::Normal,
            input: InputBuffer::new(),
            messages: Vec::new(),
            scroll_offset: 0,
            auto_scroll: true,
            pending: 0,
        }
    }

    pub fn input_mode(&self) -> ChatInputMode {
        self.input_mode
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    pub fn input_text(&self) -> &str {
        self.input.text()
    }

    // ── Input handling (two-phase) ───────────────────────────────────

    /// Returns true if the event was consumed (don't pass to global handler).
    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match self.input_mode {
            ChatInputMode::Insert => self.handle_insert_input(*code, *modifiers, services),
            ChatInputMode::Normal => self.handle_normal_input(*code, *modifiers),
        }
    }

    fn handle_insert_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        if modifiers == KeyModifiers::CONTROL {
            match code {
                // Always falls through to global
                KeyCode::Char('c') => return false,
                KeyCode::Char('u') => self.input.clear(),
                KeyCode::Char('a') => self.input.move_home(),
                KeyCode::Char('e') => self.input.move_end(),
                _ => {}
            }
            return true;
        }

        match code {
            KeyCode::Esc => self.input_mode = ChatInputMode::Normal,
            KeyCode::Enter => {
                // Blank input is rejected with no side effects
                if let Some(text) = self.input.take_trimmed() {
                    self.send_or_command(&text, services);
                }
            }
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Char(c) => self.input.insert_char(c),
            _ => {} // Consume but ignore other keys in insert mode
        }
        true
    }

    fn handle_normal_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers != KeyModifiers::NONE && modifiers != KeyModifiers::SHIFT {
            return false;
        }

        match code {
            KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => {
                self.input_mode = ChatInputMode::Insert;
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::Char('G') | KeyCode::End => self.scroll_to_bottom(),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_to_top(),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::PageUp => self.scroll_up(10),
            _ => return false, // Fall through to global handler
        }
        true
    }

    // ── Slash commands ───────────────────────────────────────────────

    fn send_or_command(&mut self, text: &str, services: &Services) {
        let Some(cmd) = text.strip_prefix('/') else {
            self.send_question(text, services);
            return;
        };
        match cmd.trim() {
            "clear" => self.cmd_clear(),
            "help" => notify(
                services,
                NotificationLevel::Info,
                "Commands: /clear /help".to_string(),
            ),
            unknown => notify(
                services,
                NotificationLevel::Warning,
                format!("Unknown command: /{unknown}"),
            ),
        }
    }

    pub fn cmd_clear(&mut self) {
        self.messages.clear();
        self.scroll_offset = 0;
        self.auto_scroll = true;
    }

    // ── Question dispatch ────────────────────────────────────────────

    /// Append the user bubble optimistically, then spawn one dispatch task.
    ///
    /// Concurrent submissions are independent: answers land on the event
    /// channel in completion order, with no coalescing and no cancellation
    /// of in-flight calls.
    fn send_question(&mut self, question: &str, services: &Services) {
        self.messages
            .push(TranscriptMessage::new(Role::User, question));
        self.scroll_to_bottom();
        self.pending += 1;

        let backend = services.backend.clone();
        let tx = services.event_tx.clone();
        let question = question.to_string();

        tokio::spawn(async move {
            match backend.ask(&question).await {
                Ok(answer) => {
                    let _ = tx.send(AppEvent::AnswerReceived(answer));
                }
                Err(e) => {
                    log::error!("Dispatch failed: {e}");
                    let _ = tx.send(AppEvent::AskFailed(e.to_string()));
                }
            }
        });
    }

    // ── Dispatch event handlers (called by AppState) ─────────────────

    pub fn on_answer(&mut self, answer: String) {
        self.pending = self.pending.saturating_sub(1);
        self.messages.push(TranscriptMessage::new(Role::Ai, answer));
        if self.auto_scroll {
            self.scroll_to_bottom();
        }
    }

    pub fn on_ask_failed(&mut self, error: &str) {
        self.pending = self.pending.saturating_sub(1);
        self.messages
            .push(TranscriptMessage::new(Role::Error, error));
        if self.auto_scroll {
            self.scroll_to_bottom();
        }
    }

    // ── Scrolling ────────────────────────────────────────────────────

    fn total_content_lines(&self) -> usize {
        self.messages.iter().map(|m| m.all_lines().len()).sum()
    }

    fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
        self.auto_scroll = false;
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
        self.auto_scroll = false;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.total_content_lines();
        self.auto_scroll = true;
    }

    fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
        self.auto_scroll = false;
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Transcript
            Constraint::Length(4), // Mode indicator + input
        ])
        .split(area);

        self.render_messages(frame, chunks[0]);
        self.render_input(frame, chunks[1]);
    }

    fn render_messages(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_MUTED))
            .title(" Chat ");

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.messages.is_empty() {
            let welcome = Paragraph::new(vec![
                Line::raw(""),
                Line::styled(
                    "  Welcome to askdoc",
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::styled(
                    "  Press i or Enter to start typing a question.",
                    Style::default().fg(theme::TEXT_MUTED),
                ),
                Line::styled(
                    "  Type /help for available commands.",
                    Style::default().fg(theme::TEXT_MUTED),
                ),
            ]);
            frame.render_widget(welcome, inner);
            return;
        }

        let all_lines: Vec<Line> = self.messages.iter().flat_map(|m| m.all_lines()).collect();

        let visible_height = inner.height as usize;
        let total = all_lines.len();

        let max_scroll = total.saturating_sub(visible_height);
        let effective_scroll = if self.auto_scroll {
            max_scroll
        } else {
            self.scroll_offset.min(max_scroll)
        };

        let visible: Vec<Line> = all_lines
            .into_iter()
            .skip(effective_scroll)
            .take(visible_height)
            .collect();

        frame.render_widget(Paragraph::new(visible), inner);

        // Scrollbar
        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(total)
                .position(effective_scroll)
                .viewport_content_length(visible_height);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut scrollbar_state,
            );
        }

        if !self.auto_scroll && effective_scroll < max_scroll {
            self.render_below_indicator(frame, inner);
        }
    }

    /// Badge in the bottom-right corner while scrolled away from the newest
    /// messages.
    fn render_below_indicator(&self, frame: &mut Frame, inner: Rect) {
        const LABEL: &str = " ↓ new messages below ";
        let width = (LABEL.chars().count() as u16).min(inner.width);
        let badge = Rect::new(
            inner.right().saturating_sub(width),
            inner.bottom().saturating_sub(1),
            width,
            1,
        );
        let line = Line::styled(
            LABEL,
            Style::default()
                .fg(theme::BG_BASE)
                .bg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(Paragraph::new(line), badge);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let mode_line = match self.input_mode {
            ChatInputMode::Insert => Line::from(Span::styled(
                " -- INSERT -- ",
                Style::default().fg(theme::BG_BASE).bg(theme::ACCENT),
            )),
            ChatInputMode::Normal => Line::from(Span::styled(
                " -- NORMAL -- ",
                Style::default().fg(theme::BG_BASE).bg(theme::TEXT_MUTED),
            )),
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Mode indicator
            Constraint::Min(1),    // Input box
        ])
        .split(area);

        frame.render_widget(Paragraph::new(mode_line), chunks[0]);
        frame.render_widget(
            render_chat_input(&self.input, self.input_mode, self.pending),
            chunks[1],
        );
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}
