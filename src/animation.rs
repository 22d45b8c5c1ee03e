use crate::easing::{lerp, Easing};
use std::f32::consts::FRAC_PI_2;

/// Angles below this magnitude count as "closed" for toggle decisions.
pub const CLOSED_EPSILON: f32 = 0.1;

/// Duration of the generic eased door swing.
pub const DOOR_SWING_MS: f64 = 500.0;

pub fn is_closed(angle: f32) -> bool {
    angle.abs() < CLOSED_EPSILON
}

/// How a transition advances toward its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Wall-clock driven: progress is `elapsed / duration` fed through `easing`.
    Timed { duration_ms: f64, easing: Easing },
    /// Frame driven: moves a fixed amount per tick regardless of elapsed time.
    Stepped { step: f32 },
}

impl Motion {
    pub const fn eased(duration_ms: f64, easing: Easing) -> Self {
        Motion::Timed { duration_ms, easing }
    }

    pub const fn linear(duration_ms: f64) -> Self {
        Motion::Timed { duration_ms, easing: Easing::Linear }
    }

    pub const fn stepped(step: f32) -> Self {
        Motion::Stepped { step }
    }
}

/// What happens when `begin` is called on a transition that is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retrigger {
    /// The request is dropped.
    #[default]
    Ignore,
    /// The running transition is replaced, starting from the current value.
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Running,
    Completed,
}

impl TickOutcome {
    pub fn completed(self) -> bool {
        matches!(self, TickOutcome::Completed)
    }
}

/// A single animated scalar (door angle, knob angle, ...) with its in-flight guard.
#[derive(Debug, Clone)]
pub struct Transition {
    current: f32,
    start_value: f32,
    target: f32,
    start_ms: f64,
    motion: Motion,
    animating: bool,
    retrigger: Retrigger,
}

impl Transition {
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            start_value: initial,
            target: initial,
            start_ms: 0.0,
            motion: Motion::linear(0.0),
            animating: false,
            retrigger: Retrigger::Ignore,
        }
    }

    pub fn with_retrigger(mut self, retrigger: Retrigger) -> Self {
        self.retrigger = retrigger;
        self
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Starts moving toward `target`. Returns `false` when the request was dropped.
    pub fn begin(&mut self, target: f32, motion: Motion, now_ms: f64) -> bool {
        if self.animating && self.retrigger == Retrigger::Ignore {
            return false;
        }
        self.start_value = self.current;
        self.target = target;
        self.start_ms = now_ms;
        self.motion = motion;
        self.animating = true;
        true
    }

    /// Opens (0 -> pi/2) or closes (-> 0) with the eased door swing.
    pub fn swing_door(&mut self, open: bool, now_ms: f64) -> bool {
        let target = if open { FRAC_PI_2 } else { 0.0 };
        self.begin(target, Motion::eased(DOOR_SWING_MS, Easing::EaseInOutQuad), now_ms)
    }

    pub fn tick(&mut self, now_ms: f64) -> TickOutcome {
        if !self.animating {
            return TickOutcome::Idle;
        }
        match self.motion {
            Motion::Timed { duration_ms, easing } => {
                let progress = if duration_ms <= 0.0 {
                    1.0
                } else {
                    ((now_ms - self.start_ms) / duration_ms).clamp(0.0, 1.0) as f32
                };
                if progress >= 1.0 {
                    return self.finish();
                }
                self.current = lerp(self.start_value, self.target, easing.apply(progress));
                TickOutcome::Running
            }
            Motion::Stepped { step } => {
                let step = step.abs();
                let remaining = self.target - self.current;
                if step <= f32::EPSILON || remaining.abs() <= step {
                    return self.finish();
                }
                self.current += step.copysign(remaining);
                TickOutcome::Running
            }
        }
    }

    /// Jumps straight to `value`, dropping any in-flight transition.
    pub fn snap(&mut self, value: f32) {
        self.current = value;
        self.start_value = value;
        self.target = value;
        self.animating = false;
    }

    fn finish(&mut self) -> TickOutcome {
        self.current = self.target;
        self.animating = false;
        TickOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn timed_transition_reaches_target_and_reports_completion_once() {
        let mut t = Transition::new(0.0);
        assert!(t.begin(FRAC_PI_2, Motion::eased(500.0, Easing::EaseOutCubic), 1_000.0));
        assert_eq!(t.tick(1_250.0), TickOutcome::Running);
        assert!(t.value() > 0.0 && t.value() < FRAC_PI_2);
        assert_eq!(t.tick(1_500.0), TickOutcome::Completed);
        assert_eq!(t.value(), FRAC_PI_2);
        assert_eq!(t.tick(1_600.0), TickOutcome::Idle);
        assert_eq!(t.tick(9_000.0), TickOutcome::Idle);
        assert_eq!(t.value(), FRAC_PI_2);
    }

    #[test]
    fn ignore_policy_drops_second_begin() {
        let mut t = Transition::new(0.0);
        assert!(t.begin(1.0, Motion::linear(100.0), 0.0));
        assert!(!t.begin(-1.0, Motion::linear(100.0), 10.0));
        assert_eq!(t.target(), 1.0);
    }

    #[test]
    fn restart_policy_continues_from_current_value() {
        let mut t = Transition::new(0.0).with_retrigger(Retrigger::Restart);
        t.begin(FRAC_PI_2, Motion::linear(300.0), 0.0);
        t.tick(150.0);
        let midway = t.value();
        assert!(t.begin(0.0, Motion::linear(300.0), 150.0));
        t.tick(150.0);
        assert!((t.value() - midway).abs() < 1e-6);
        assert!(t.tick(450.0).completed());
        assert_eq!(t.value(), 0.0);
    }

    #[test]
    fn stepped_transition_ignores_wall_clock() {
        let mut t = Transition::new(0.0);
        t.begin(FRAC_PI_2, Motion::stepped(0.1), 0.0);
        let mut ticks = 0;
        while !t.tick(0.0).completed() {
            ticks += 1;
            assert!(ticks < 100, "stepped transition never finished");
        }
        assert_eq!(ticks, 15);
        assert_eq!(t.value(), FRAC_PI_2);
    }

    #[test]
    fn snap_clears_guard() {
        let mut t = Transition::new(0.0);
        t.begin(1.0, Motion::linear(1_000.0), 0.0);
        t.snap(0.0);
        assert!(!t.is_animating());
        assert!(t.begin(1.0, Motion::linear(1_000.0), 0.0));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut t = Transition::new(0.0);
        t.begin(2.0, Motion::linear(0.0), 0.0);
        assert!(t.tick(0.0).completed());
        assert_eq!(t.value(), 2.0);
    }

    #[test]
    fn closed_predicate_uses_epsilon() {
        assert!(is_closed(0.05));
        assert!(is_closed(-0.05));
        assert!(!is_closed(0.15));
        assert!(!is_closed(-FRAC_PI_2));
    }
}
