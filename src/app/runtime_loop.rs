use crate::time::{FrameTime, Time};

pub(crate) struct RuntimeLoop {
    time: Time,
    max_frame_delta: f32,
}

pub(crate) struct RuntimeTick {
    pub frame: FrameTime,
    pub dropped_delta: Option<f32>,
}

impl RuntimeLoop {
    pub(crate) fn new(time: Time, max_frame_delta: f32) -> Self {
        Self { time, max_frame_delta: max_frame_delta.max(f32::EPSILON) }
    }

    pub(crate) fn time(&self) -> &Time {
        &self.time
    }

    /// Advances the clock once; deltas beyond the cap (window stalls, debugger pauses) are dropped.
    pub(crate) fn tick(&mut self) -> RuntimeTick {
        self.time.tick();
        let mut frame = self.time.frame();
        let mut dropped_delta = None;
        if frame.delta_seconds > self.max_frame_delta {
            dropped_delta = Some(frame.delta_seconds - self.max_frame_delta);
            frame.delta_seconds = self.max_frame_delta;
        }
        RuntimeTick { frame, dropped_delta }
    }
}
