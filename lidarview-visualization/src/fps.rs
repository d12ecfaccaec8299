//! Frames-per-second monitor

use std::collections::VecDeque;
use std::time::Duration;

use instant::Instant;

const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames stamped within the last second
#[derive(Debug, Clone, Default)]
pub struct FpsMonitor {
    stamps: VecDeque<Instant>,
}

impl FpsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a frame at `now` and return the frame count of the last second
    pub fn count(&mut self, now: Instant) -> usize {
        self.stamps.push_back(now);
        while let Some(&oldest) = self.stamps.front() {
            if now.saturating_duration_since(oldest) > WINDOW {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
        self.stamps.len()
    }
}
