use std::time::Duration;

/// Rejects presses that arrive too soon after the previous one, which would
/// otherwise land in the middle of an expand or collapse animation.
#[derive(Debug, Clone)]
pub struct RepeatGuard {
    threshold: Duration,
    last: Option<Duration>,
}

impl RepeatGuard {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    /// Records a press at `now` and says whether it may be handled.
    /// Rejected presses still restart the window.
    pub fn admit(&mut self, now: Duration) -> bool {
        let too_soon = self
            .last
            .is_some_and(|last| now.saturating_sub(last) <= self.threshold);
        self.last = Some(now);
        !too_soon
    }
}
