// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal front ends for a running session.
//!
//! [`run_interactive`] owns the terminal (alternate screen, raw mode) and
//! redraws on every published snapshot. [`run_plain`] prints each new row
//! once, for pipes and `--plain`.

use std::io::{self, Write};
use std::pin::pin;

use agent_console_frames::EventFrame;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use futures_util::{Stream, StreamExt};
use unicode_width::UnicodeWidthStr;

use crate::colors;
use crate::driver::SessionHandle;
use crate::render::{self, Viewport, EMPTY_MESSAGE};
use crate::session::{ConsoleSnapshot, SessionState};

/// Header, separator and key hint.
const CHROME_ROWS: u16 = 3;

const KEY_HINT: &str = "q quit · c clear · a auto-scroll · ↑↓ PgUp PgDn Home End scroll";

/// What a key press asks the view to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewAction {
    Quit,
    Clear,
    ToggleAutoScroll,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Map a key event to an action. Releases and unbound keys map to `None`.
pub fn key_action(key: KeyEvent) -> Option<ViewAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(ViewAction::Quit),
        _ if ctrl => None,
        KeyCode::Char('q') | KeyCode::Esc => Some(ViewAction::Quit),
        KeyCode::Char('c') => Some(ViewAction::Clear),
        KeyCode::Char('a') => Some(ViewAction::ToggleAutoScroll),
        KeyCode::Up | KeyCode::Char('k') => Some(ViewAction::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(ViewAction::ScrollDown),
        KeyCode::PageUp => Some(ViewAction::PageUp),
        KeyCode::PageDown => Some(ViewAction::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(ViewAction::Top),
        KeyCode::End | KeyCode::Char('G') => Some(ViewAction::Bottom),
        _ => None,
    }
}

/// Apply a scrolling action. Returns `false` for actions the viewport does
/// not handle.
pub fn scroll(viewport: &mut Viewport, action: ViewAction, page_rows: usize) -> bool {
    let page_rows = page_rows.max(1);
    match action {
        ViewAction::ToggleAutoScroll => viewport.toggle_auto_scroll(),
        ViewAction::ScrollUp => viewport.scroll_up(1),
        ViewAction::ScrollDown => viewport.scroll_down(1),
        ViewAction::PageUp => viewport.scroll_up(page_rows),
        ViewAction::PageDown => viewport.scroll_down(page_rows),
        ViewAction::Top => viewport.top(),
        ViewAction::Bottom => viewport.bottom(),
        ViewAction::Quit | ViewAction::Clear => return false,
    }
    true
}

/// A run of text in one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub color: Option<(u8, u8, u8)>,
    pub bold: bool,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: false,
        }
    }

    fn colored(text: impl Into<String>, color: (u8, u8, u8)) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
            bold: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// One screen line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    /// The line without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Drop whatever does not fit in `width` columns.
    fn fit(self, width: usize) -> Self {
        let mut remaining = width;
        let mut spans = Vec::with_capacity(self.spans.len());
        for span in self.spans {
            let w = span.text.width();
            if w <= remaining {
                remaining -= w;
                spans.push(span);
                continue;
            }
            spans.push(Span {
                text: render::truncate_to_width(&span.text, remaining),
                ..span
            });
            break;
        }
        Self { spans }
    }
}

fn row_line(frame: &EventFrame) -> Line {
    let parts = render::row_parts(frame);
    let mut spans = vec![
        Span::colored(parts.time, colors::TEXT_GRAY),
        Span::plain(" "),
        Span::colored(parts.style.glyph, parts.style.color),
        Span::plain(" "),
    ];
    if let Some(agent) = parts.agent {
        spans.push(Span::colored(format!("[{}] ", agent), colors::AGENT_PURPLE).bold());
    }
    spans.push(Span::plain(parts.message));
    Line { spans }
}

/// Lay out a full screen of `width` x `height` cells.
pub fn layout(
    snapshot: &ConsoleSnapshot,
    viewport: &mut Viewport,
    width: u16,
    height: u16,
) -> Vec<Line> {
    let width = usize::from(width);
    let pane = usize::from(height.saturating_sub(CHROME_ROWS));
    let indicator = if snapshot.connected {
        colors::SUCCESS_GREEN
    } else {
        colors::ERROR_RED
    };

    let mut lines = vec![
        Line {
            spans: vec![
                Span::plain("Agent Console  ").bold(),
                Span::colored(render::status_line(snapshot, viewport.auto_scroll()), indicator),
            ],
        },
        Line {
            spans: vec![Span::colored("─".repeat(width), colors::DIM_GRAY)],
        },
    ];

    let range = viewport.window(snapshot.frames.len(), pane);
    let mut body: Vec<Line> = snapshot.frames[range].iter().map(row_line).collect();
    if snapshot.frames.is_empty() && pane > 0 {
        body.push(Line {
            spans: vec![Span::colored(EMPTY_MESSAGE, colors::DIM_GRAY)],
        });
    }
    body.resize(pane, Line::default());
    lines.extend(body);

    lines.push(Line {
        spans: vec![Span::colored(KEY_HINT, colors::DIM_GRAY)],
    });
    lines
        .into_iter()
        .take(usize::from(height))
        .map(|line| line.fit(width))
        .collect()
}

fn draw<W: Write>(out: &mut W, lines: &[Line]) -> io::Result<()> {
    for (y, line) in (0u16..).zip(lines) {
        queue!(out, MoveTo(0, y))?;
        for span in &line.spans {
            if span.bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if let Some((r, g, b)) = span.color {
                queue!(out, SetForegroundColor(Color::Rgb { r, g, b }))?;
            }
            queue!(
                out,
                Print(&span.text),
                ResetColor,
                SetAttribute(Attribute::Reset)
            )?;
        }
        queue!(out, Clear(ClearType::UntilNewLine))?;
    }
    queue!(out, Clear(ClearType::FromCursorDown))?;
    out.flush()
}

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter<W: Write>(out: &mut W) -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Run the full-screen console until the user quits or the session is
/// torn down.
///
/// A server-side close leaves the view up so the disconnect row stays
/// visible.
pub async fn run_interactive(handle: &SessionHandle, auto_scroll: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    let _guard = TerminalGuard::enter(&mut stdout)?;
    console_loop(handle, EventStream::new(), &mut stdout, terminal::size, auto_scroll).await
}

/// Redraw on every snapshot and apply key presses from `events`.
///
/// Returns on quit, when `events` ends, or once the session is torn down and
/// disconnected. Teardown is observed even after the driver has finished.
pub async fn console_loop<S, W, F>(
    handle: &SessionHandle,
    events: S,
    out: &mut W,
    size: F,
    auto_scroll: bool,
) -> io::Result<()>
where
    S: Stream<Item = io::Result<Event>>,
    W: Write,
    F: Fn() -> io::Result<(u16, u16)>,
{
    let mut events = pin!(events);
    let mut snapshots = handle.subscribe();
    let mut viewport = Viewport::new(auto_scroll);
    let mut driver_live = true;

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        let (width, height) = size()?;
        let lines = layout(&snapshot, &mut viewport, width, height);
        draw(out, &lines)?;

        if snapshot.state == SessionState::Disconnected && handle.is_torn_down() {
            return Ok(());
        }

        tokio::select! {
            changed = snapshots.changed(), if driver_live => {
                if changed.is_err() {
                    driver_live = false;
                }
            }
            // While the driver runs, its final snapshot reports the teardown.
            _ = handle.torn_down(), if !driver_live => {}
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    let Some(action) = key_action(key) else { continue };
                    match action {
                        ViewAction::Quit => return Ok(()),
                        ViewAction::Clear => handle.clear(),
                        other => {
                            let page = usize::from(height.saturating_sub(CHROME_ROWS));
                            scroll(&mut viewport, other, page);
                        }
                    }
                }
                // Resizes and everything else just trigger a redraw.
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            }
        }
    }
}

/// Tracks which rows a line printer has already emitted.
#[derive(Debug, Default)]
pub struct PlainPrinter {
    printed_total: u64,
}

impl PlainPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows appended since the previous call. Rows evicted before they were
    /// observed are skipped.
    pub fn new_rows<'a>(&mut self, snapshot: &'a ConsoleSnapshot) -> &'a [EventFrame] {
        let fresh = snapshot.appended_total.saturating_sub(self.printed_total);
        let fresh = usize::try_from(fresh)
            .unwrap_or(usize::MAX)
            .min(snapshot.frames.len());
        self.printed_total = snapshot.appended_total;
        &snapshot.frames[snapshot.frames.len() - fresh..]
    }
}

/// Print rows as they arrive until the session disconnects.
pub async fn run_plain<W: Write>(handle: &SessionHandle, out: &mut W, ansi: bool) -> io::Result<()> {
    let mut snapshots = handle.subscribe();
    let mut printer = PlainPrinter::new();
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        for frame in printer.new_rows(&snapshot) {
            writeln!(out, "{}", render::render_row(frame, ansi))?;
        }
        out.flush()?;
        if snapshot.state == SessionState::Disconnected {
            return Ok(());
        }
        if snapshots.changed().await.is_err() {
            return Ok(());
        }
    }
}

/// Print every row currently in `snapshot`.
pub fn print_snapshot<W: Write>(snapshot: &ConsoleSnapshot, out: &mut W, ansi: bool) -> io::Result<()> {
    for frame in &snapshot.frames {
        writeln!(out, "{}", render::render_row(frame, ansi))?;
    }
    out.flush()
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
