use std::time::{Duration, Instant};

/// The transient message currently on screen, if any.
#[derive(Debug, Default)]
pub struct ToastBoard {
    current: Option<(String, Instant)>,
}

impl ToastBoard {
    pub fn show(&mut self, message: String, duration: Duration, now: Instant) {
        self.current = Some((message, now + duration));
    }

    pub fn active(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((message, until)) if now < *until => Some(message.as_str()),
            _ => None,
        }
    }

    /// Drops an expired toast. Returns true when one was dismissed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let expired = matches!(&self.current, Some((_, until)) if now >= *until);
        if expired {
            self.current = None;
        }
        expired
    }
}
