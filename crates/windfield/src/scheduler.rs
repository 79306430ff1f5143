// Start/stop control for the frame loop

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Running flag shared between the context and whoever drives frames.
///
/// The host calls `tick` once per display refresh; the flag is read at the
/// top of each tick so a stop takes effect before any more work is done.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    running: Arc<AtomicBool>,
    frames: u64,
}

/// Cloneable stop switch for code that does not own the scheduler
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    running: Arc<AtomicBool>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running.store(true, Ordering::Release);
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Claim the next frame. Returns false when stopped.
    pub fn begin_frame(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.frames += 1;
        true
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
