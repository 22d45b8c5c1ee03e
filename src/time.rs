use std::time::{Duration, Instant};

pub struct Time {
    start: Instant,
    last: Instant,
    pub delta: Duration,
}
impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now, delta: Duration::from_secs_f32(0.0) }
    }
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last;
        self.last = now;
    }
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
    pub fn elapsed_seconds(&self) -> f32 {
        self.last.duration_since(self.start).as_secs_f32()
    }
    /// Milliseconds since start, measured now rather than at the last tick.
    pub fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1_000.0
    }
    pub fn frame(&self) -> FrameTime {
        let now_ms = self.last.duration_since(self.start).as_secs_f64() * 1_000.0;
        FrameTime { now_ms, delta_seconds: self.delta_seconds(), elapsed_seconds: self.elapsed_seconds() }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot handed to every per-frame update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Timestamp used by timed transitions.
    pub now_ms: f64,
    pub delta_seconds: f32,
    pub elapsed_seconds: f32,
}

impl FrameTime {
    pub fn new(now_ms: f64, delta_seconds: f32) -> Self {
        Self { now_ms, delta_seconds, elapsed_seconds: (now_ms / 1_000.0) as f32 }
    }
}
