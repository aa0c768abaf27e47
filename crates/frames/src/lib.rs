// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event frames and the bounded log buffer behind the agent console.
//!
//! This crate has no async or terminal dependencies: it covers the wire
//! classification of inbound payloads, the capped FIFO that holds received
//! frames, and an optional JSONL recorder.

mod buffer;
mod frame;
mod recorder;

pub use buffer::{LogBuffer, DEFAULT_CAPACITY};
pub use frame::{
    EventFrame, FrameError, FrameStatus, Inbound, DISCONNECTED_MESSAGE, HEARTBEAT_REPLY,
    SYSTEM_FRAME_TYPE,
};
pub use recorder::FrameRecorder;
