// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Console palette and ANSI escape helpers.

use agent_console_frames::FrameStatus;

/// Gray for timestamps and the status bar: RGB(153, 153, 153)
pub const TEXT_GRAY: (u8, u8, u8) = (153, 153, 153);

/// Dark gray for separators and unknown statuses: RGB(110, 110, 110)
pub const DIM_GRAY: (u8, u8, u8) = (110, 110, 110);

/// Blue for running frames: RGB(96, 165, 250)
pub const RUNNING_BLUE: (u8, u8, u8) = (96, 165, 250);

/// Green for success frames and the connected indicator: RGB(74, 222, 128)
pub const SUCCESS_GREEN: (u8, u8, u8) = (74, 222, 128);

/// Red for error frames and the disconnected indicator: RGB(248, 113, 113)
pub const ERROR_RED: (u8, u8, u8) = (248, 113, 113);

/// Light gray for info frames: RGB(200, 200, 200)
pub const INFO_GRAY: (u8, u8, u8) = (200, 200, 200);

/// Purple for agent badges: RGB(175, 135, 255)
pub const AGENT_PURPLE: (u8, u8, u8) = (175, 135, 255);

/// Glyph and color for a frame status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusStyle {
    pub glyph: &'static str,
    pub color: (u8, u8, u8),
}

/// Style for a status. Anything outside the four known statuses, including
/// a missing status, gets the default style.
pub fn status_style(status: Option<&FrameStatus>) -> StatusStyle {
    match status {
        Some(FrameStatus::Running) => StatusStyle {
            glyph: "●",
            color: RUNNING_BLUE,
        },
        Some(FrameStatus::Success) => StatusStyle {
            glyph: "✓",
            color: SUCCESS_GREEN,
        },
        Some(FrameStatus::Error) => StatusStyle {
            glyph: "✗",
            color: ERROR_RED,
        },
        Some(FrameStatus::Info) => StatusStyle {
            glyph: "ℹ",
            color: INFO_GRAY,
        },
        Some(FrameStatus::Unknown(_)) | None => StatusStyle {
            glyph: "•",
            color: DIM_GRAY,
        },
    }
}

/// ANSI escape sequence helpers
pub mod escape {
    /// 24-bit foreground color
    pub fn fg(rgb: (u8, u8, u8)) -> String {
        format!("\x1b[38;2;{};{};{}m", rgb.0, rgb.1, rgb.2)
    }

    /// Reset all attributes
    pub const RESET: &str = "\x1b[0m";

    /// Bold
    pub const BOLD: &str = "\x1b[1m";
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
