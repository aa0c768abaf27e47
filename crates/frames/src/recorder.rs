// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL recording of appended frames.

use crate::frame::EventFrame;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Appends every frame it is given to a JSONL file, one object per line.
///
/// Clones share the same writer.
#[derive(Clone)]
pub struct FrameRecorder {
    path: PathBuf,
    writer: Arc<Mutex<BufWriter<File>>>,
    written: Arc<Mutex<u64>>,
}

impl FrameRecorder {
    /// Create (or truncate) the recording file.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_file(path, file))
    }

    /// Open the recording file for appending, creating it if missing.
    pub fn append(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: &Path, file: File) -> Self {
        Self {
            path: path.to_path_buf(),
            writer: Arc::new(Mutex::new(BufWriter::new(file))),
            written: Arc::new(Mutex::new(0)),
        }
    }

    /// Write one frame and flush.
    pub fn record(&self, frame: &EventFrame) -> std::io::Result<()> {
        let json = serde_json::to_string(frame)?;
        let mut w = self.writer.lock();
        writeln!(w, "{}", json)?;
        w.flush()?;
        *self.written.lock() += 1;
        Ok(())
    }

    /// Number of frames successfully written through this recorder.
    pub fn written(&self) -> u64 {
        *self.written.lock()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a recording back. Lines that are not frames are skipped.
    pub fn read_frames(path: &Path) -> std::io::Result<Vec<EventFrame>> {
        let content = std::fs::read_to_string(path)?;
        Ok(content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

impl std::fmt::Debug for FrameRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRecorder")
            .field("path", &self.path)
            .field("written", &self.written())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
