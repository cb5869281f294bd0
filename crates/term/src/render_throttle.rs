use std::time::{Duration, Instant};

/// Caps the frame rate of the driving loop.
///
/// The first frame always renders; after that a frame renders once at least
/// `interval` has passed since the previous one. `invalidate` forces the
/// next frame (resize, screen change).
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    interval: Duration,
    last_render: Option<Instant>,
}

impl RenderThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_render: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether to render a new frame, recording it if so.
    pub fn should_render(&mut self, now: Instant) -> bool {
        let due = match self.last_render {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last_render = Some(now);
        }
        due
    }

    pub fn invalidate(&mut self) {
        self.last_render = None;
    }
}
