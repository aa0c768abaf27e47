// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Presentation of the log buffer.
//!
//! Everything here is a pure function of the frames and the connection flag.
//! Both the full-screen view and the plain line printer build on it.

use std::ops::Range;

use agent_console_frames::EventFrame;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::colors::{self, escape, StatusStyle};
use crate::session::{ConsoleSnapshot, SessionState};

/// Shown in place of rows while the buffer is empty.
pub const EMPTY_MESSAGE: &str = "Waiting for agent activity…";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Format a frame timestamp as local `HH:MM:SS`.
///
/// Unparsable timestamps are returned unchanged.
pub fn format_time(timestamp: &str) -> String {
    format_time_in(timestamp, &Local)
}

/// [`format_time`] against an explicit time zone.
///
/// Timestamps carrying an offset are converted to `tz`. Timestamps without
/// one are taken to already be in `tz`.
pub fn format_time_in<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(tz).format("%H:%M:%S").to_string();
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, format) {
            return naive.format("%H:%M:%S").to_string();
        }
    }
    // A bare date means midnight.
    if NaiveDate::parse_from_str(timestamp, "%Y-%m-%d").is_ok() {
        return "00:00:00".to_string();
    }
    timestamp.to_string()
}

/// Collapse line breaks and tabs so a message fits on one row.
fn single_line(message: &str) -> String {
    message
        .split(['\n', '\r', '\t'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The pieces of one rendered row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowParts<'a> {
    pub time: String,
    pub style: StatusStyle,
    pub agent: Option<&'a str>,
    pub message: String,
}

pub fn row_parts(frame: &EventFrame) -> RowParts<'_> {
    RowParts {
        time: format_time(&frame.timestamp),
        style: colors::status_style(frame.status.as_ref()),
        agent: frame.agent.as_deref(),
        message: single_line(&frame.message),
    }
}

/// Render a row as `HH:MM:SS <glyph> [agent] message`.
pub fn render_row(frame: &EventFrame, ansi: bool) -> String {
    let parts = row_parts(frame);
    let agent = parts.agent.map(|a| format!("[{}] ", a)).unwrap_or_default();
    if !ansi {
        return format!(
            "{} {} {}{}",
            parts.time, parts.style.glyph, agent, parts.message
        );
    }
    let badge = if agent.is_empty() {
        String::new()
    } else {
        format!(
            "{}{}{}{}",
            escape::BOLD,
            escape::fg(colors::AGENT_PURPLE),
            agent,
            escape::RESET
        )
    };
    format!(
        "{gray}{time}{reset} {color}{glyph}{reset} {badge}{message}",
        gray = escape::fg(colors::TEXT_GRAY),
        time = parts.time,
        reset = escape::RESET,
        color = escape::fg(parts.style.color),
        glyph = parts.style.glyph,
        badge = badge,
        message = parts.message,
    )
}

/// One-line connection summary for the status bar.
pub fn status_line(snapshot: &ConsoleSnapshot, auto_scroll: bool) -> String {
    let connection = match (snapshot.connected, snapshot.state) {
        (true, _) => "● connected",
        (false, SessionState::Connecting) => "○ connecting",
        (false, _) => "○ disconnected",
    };
    let frames = match snapshot.frames.len() {
        1 => "1 frame".to_string(),
        n => format!("{} frames", n),
    };
    let scroll = if auto_scroll {
        "auto-scroll on"
    } else {
        "auto-scroll off"
    };
    format!("{} · {} · {}", connection, frames, scroll)
}

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Which rows of the buffer are on screen.
///
/// With auto-scroll on, the window is pinned to the newest rows and follows
/// every buffer change. Any manual scroll turns auto-scroll off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    auto_scroll: bool,
    offset: usize,
}

impl Viewport {
    pub fn new(auto_scroll: bool) -> Self {
        Self {
            auto_scroll,
            offset: 0,
        }
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    /// Rows to show for a buffer of `total` rows and a pane `height` rows tall.
    pub fn window(&mut self, total: usize, height: usize) -> Range<usize> {
        let max_offset = total.saturating_sub(height);
        self.offset = if self.auto_scroll {
            max_offset
        } else {
            self.offset.min(max_offset)
        };
        self.offset..(self.offset + height).min(total)
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.auto_scroll = false;
        self.offset = self.offset.saturating_sub(rows);
    }

    /// Clamped against the buffer on the next [`Viewport::window`] call.
    pub fn scroll_down(&mut self, rows: usize) {
        self.auto_scroll = false;
        self.offset = self.offset.saturating_add(rows);
    }

    pub fn top(&mut self) {
        self.auto_scroll = false;
        self.offset = 0;
    }

    /// Jump to the newest row and follow from there.
    pub fn bottom(&mut self) {
        self.auto_scroll = true;
    }

    pub fn toggle_auto_scroll(&mut self) {
        self.auto_scroll = !self.auto_scroll;
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
