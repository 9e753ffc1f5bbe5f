use std::f64::consts::PI;
use std::time::Duration;

const DEFAULT_TENSION: f64 = 2.0;

/// Maps linear time in `[0, 1]` onto animated progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    AccelerateDecelerate,
    /// Runs past the target, then settles back onto it.
    Overshoot(f64),
    /// Pulls back briefly before heading for the target.
    Anticipate(f64),
}

impl Easing {
    pub fn overshoot() -> Self {
        Self::Overshoot(DEFAULT_TENSION)
    }

    pub fn anticipate() -> Self {
        Self::Anticipate(DEFAULT_TENSION)
    }

    pub fn apply(&self, t: f64) -> f64 {
        match *self {
            Self::Linear => t,
            Self::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
            Self::Overshoot(tension) => {
                let t = t - 1.0;
                t * t * ((tension + 1.0) * t + tension) + 1.0
            }
            Self::Anticipate(tension) => t * t * ((tension + 1.0) * t - tension),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub value: f64,
    pub finished: bool,
}

/// A single eased value animating between two endpoints on the host clock.
///
/// Time is whatever monotonic clock the host ticks with; only differences
/// between timestamps matter.
#[derive(Debug, Clone)]
pub struct Timeline {
    duration: Duration,
    easing: Easing,
    from: f64,
    to: f64,
    started_at: Option<Duration>,
    value: f64,
}

impl Timeline {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            from: 0.0,
            to: 1.0,
            started_at: None,
            value: 0.0,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start(&mut self, now: Duration, from: f64, to: f64) {
        self.from = from;
        self.to = to;
        self.value = from;
        self.started_at = Some(now);
    }

    /// Stops without reaching the end value. Returns whether it was running.
    pub fn cancel(&mut self) -> bool {
        self.started_at.take().is_some()
    }

    /// Advances to `now`. Yields nothing when the timeline is not running.
    pub fn advance(&mut self, now: Duration) -> Option<Frame> {
        let started = self.started_at?;
        let elapsed = now.saturating_sub(started);

        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        let finished = t >= 1.0;

        self.value = if finished {
            self.to
        } else {
            self.from + (self.to - self.from) * self.easing.apply(t)
        };
        if finished {
            self.started_at = None;
        }

        Some(Frame {
            value: self.value,
            finished,
        })
    }
}
