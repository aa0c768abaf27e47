// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capped, oldest-evicted-first log buffer.

use crate::frame::EventFrame;
use std::collections::VecDeque;

/// Default number of frames the console keeps.
pub const DEFAULT_CAPACITY: usize = 200;

/// Ordered frame buffer holding at most `capacity` frames.
///
/// Insertion order is display order. Once full, every push evicts from the
/// front so exactly the newest `capacity` frames remain.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    frames: VecDeque<EventFrame>,
    capacity: usize,
}

impl LogBuffer {
    /// Create an empty buffer. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Append a frame, returning how many old frames were evicted.
    pub fn push(&mut self, frame: EventFrame) -> usize {
        self.frames.push_back(frame);
        let excess = self.frames.len().saturating_sub(self.capacity);
        self.frames.drain(..excess);
        excess
    }

    /// Drop every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Maximum number of frames retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &EventFrame> + ExactSizeIterator {
        self.frames.iter()
    }

    /// Most recently appended frame.
    pub fn last(&self) -> Option<&EventFrame> {
        self.frames.back()
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<EventFrame> {
        self.frames.iter().cloned().collect()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
