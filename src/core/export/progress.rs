//! Shared progress value
//!
//! The export worker writes, the interactive thread reads. Both sides only
//! see a percentage, so a single atomic byte is all the state that crosses
//! threads.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Percentage reached after the destination is opened
pub const OPENED: u8 = 10;
/// Percentage reached after definitions are written
pub const DEFINITIONS_DONE: u8 = 20;
/// Share of the bar covered by the requirement-object phase
pub const OBJECTS_SPAN: u8 = 60;
/// Percentage reached after traces are written
pub const TRACES_DONE: u8 = 90;
/// Percentage reached after specifications are written
pub const SPECIFICATIONS_DONE: u8 = 95;
/// Percentage reached after the destination is closed
pub const CLOSED: u8 = 100;

/// Cloneable handle on the progress of one run
#[derive(Debug, Clone, Default)]
pub struct Progress(Arc<AtomicU8>);

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current percentage
    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    /// Sets a milestone, capped at 100
    pub fn set(&self, percent: u8) {
        self.0.store(percent.min(CLOSED), Ordering::Relaxed);
    }

    /// Progress inside the requirement-object phase
    pub fn objects(&self, done: usize, total: usize) {
        let share = if total == 0 {
            OBJECTS_SPAN as usize
        } else {
            (OBJECTS_SPAN as usize * done.min(total)) / total
        };
        self.set(DEFINITIONS_DONE + share as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestones() {
        let progress = Progress::new();
        assert_eq!(progress.get(), 0);

        progress.set(OPENED);
        assert_eq!(progress.get(), 10);

        progress.set(200);
        assert_eq!(progress.get(), 100);
    }

    #[test]
    fn test_objects_share() {
        let progress = Progress::new();
        progress.objects(0, 4);
        assert_eq!(progress.get(), 20);
        progress.objects(2, 4);
        assert_eq!(progress.get(), 50);
        progress.objects(4, 4);
        assert_eq!(progress.get(), 80);
        progress.objects(0, 0);
        assert_eq!(progress.get(), 80);
    }

    #[test]
    fn test_clones_share_state() {
        let progress = Progress::new();
        let observer = progress.clone();
        progress.set(TRACES_DONE);
        assert_eq!(observer.get(), TRACES_DONE);
    }
}
