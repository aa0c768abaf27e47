// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    running = { Some(FrameStatus::Running), "●", RUNNING_BLUE },
    success = { Some(FrameStatus::Success), "✓", SUCCESS_GREEN },
    error = { Some(FrameStatus::Error), "✗", ERROR_RED },
    info = { Some(FrameStatus::Info), "ℹ", INFO_GRAY },
    unknown = { Some(FrameStatus::Unknown("queued".into())), "•", DIM_GRAY },
    absent = { None, "•", DIM_GRAY },
)]
fn status_glyphs(status: Option<FrameStatus>, glyph: &str, color: (u8, u8, u8)) {
    let style = status_style(status.as_ref());
    assert_eq!(style.glyph, glyph);
    assert_eq!(style.color, color);
}

#[test]
fn fg_escape_is_24_bit() {
    assert_eq!(escape::fg(RUNNING_BLUE), "\x1b[38;2;96;165;250m");
}
