use serde::Serialize;

use crate::common::P;

/// One cell filling with water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowFrame {
    pub index: usize,
    pub pos: P,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Frame(FlowFrame),
    /// Every cell is filled; reported once, on the tick after the last frame.
    Done,
    /// The tick index is not the one the animation waits for.
    Stale,
}

/// Cursor over a connected path, advanced one cell per timer tick.
///
/// Nothing here sleeps or schedules; the owner of the timer asks for the next
/// tick and stops asking to cancel.
#[derive(Debug, Clone)]
pub struct FlowAnimation {
    path: Vec<P>,
    cursor: usize,
}

impl FlowAnimation {
    pub fn new(path: Vec<P>) -> FlowAnimation {
        FlowAnimation { path, cursor: 0 }
    }
    pub fn path(&self) -> &[P] {
        &self.path
    }
    /// Index of the tick this animation expects next.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn is_finished(&self) -> bool {
        self.cursor > self.path.len()
    }
    /// Cells already filled.
    pub fn wetted(&self) -> &[P] {
        &self.path[..self.cursor.min(self.path.len())]
    }

    pub fn next_frame(&mut self, index: usize) -> FlowStep {
        if index != self.cursor || self.is_finished() {
            return FlowStep::Stale;
        }
        self.cursor += 1;
        match self.path.get(index) {
            Some(&pos) => FlowStep::Frame(FlowFrame { index, pos }),
            None => FlowStep::Done,
        }
    }
}

impl Iterator for FlowAnimation {
    type Item = FlowFrame;

    fn next(&mut self) -> Option<FlowFrame> {
        match self.next_frame(self.cursor) {
            FlowStep::Frame(frame) => Some(frame),
            _ => None,
        }
    }
}
