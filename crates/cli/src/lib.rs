// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Agent Console
//!
//! A terminal client for the agent log stream. It holds one WebSocket
//! connection, keeps the newest frames in a bounded buffer, sends a periodic
//! heartbeat and renders the buffer either full-screen or line by line.
//!
//! The pieces, bottom-up:
//!
//! - [`session::ConnectionSession`] applies socket events to the buffer and
//!   the connected flag. Pure state, no I/O.
//! - [`transport::Transport`] abstracts the socket; [`ws::WsTransport`] is
//!   the WebSocket client and [`transport::ChannelTransport`] an in-memory
//!   stand-in.
//! - [`driver::spawn_session`] runs a session over a transport on a tokio
//!   task and publishes snapshots. [`driver::SessionHandle::teardown`] stops
//!   it exactly once.
//! - [`render`] and [`view`] turn snapshots into rows.

pub mod app;
pub mod cli;
pub mod colors;
pub mod config;
pub mod diagnostic;
pub mod driver;
pub mod env;
pub mod logging;
pub mod render;
pub mod replay;
pub mod session;
pub mod time;
pub mod transport;
pub mod view;
pub mod ws;
