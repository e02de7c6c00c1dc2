//! Single-instance guard for the render loop.

use core::fmt::{self, Display, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};

static RUNNING: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyRunning;

impl Display for AlreadyRunning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("event loop already running")
    }
}

pub struct EventLoop;

impl EventLoop {
    pub fn is_running() -> bool {
        RUNNING.load(Ordering::Acquire)
    }

    /// Claim the event loop. The loop counts as running until the token is dropped.
    pub fn start() -> Result<Running, AlreadyRunning> {
        RUNNING
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Running { _private: () })
            .map_err(|_| AlreadyRunning)
    }
}

/// Held by the running loop
#[derive(Debug)]
pub struct Running {
    _private: (),
}

impl Drop for Running {
    fn drop(&mut self) {
        RUNNING.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the flag is process-global and tests run in parallel.
    #[test]
    fn test_start_once() {
        assert!(!EventLoop::is_running());
        let running = EventLoop::start().unwrap();
        assert!(EventLoop::is_running());
        assert_eq!(EventLoop::start().err(), Some(AlreadyRunning));
        drop(running);
        assert!(!EventLoop::is_running());
        assert!(EventLoop::start().is_ok());
    }
}
