//! Request tokens
//!
//! Every fetch issued by a list controller is tagged with a
//! [`RequestToken`]. Only a response carrying the most recently issued token
//! may touch controller state; anything older is discarded regardless of
//! arrival order.

use std::fmt;

/// Opaque marker of one fetch invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw generation number (for logging)
    pub fn generation(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tokens and decides which one is current
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: u64,
    current: Option<RequestToken>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token, superseding any outstanding one
    pub fn issue(&mut self) -> RequestToken {
        self.generation += 1;
        let token = RequestToken(self.generation);
        if let Some(previous) = self.current.replace(token) {
            tracing::debug!("Request {} superseded by {}", previous, token);
        }
        token
    }

    /// Whether `token` is the latest issued and still valid
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Whether a request is outstanding
    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }

    /// Mark the current token as resolved
    ///
    /// Returns `true` if `token` was current. A resolved token is no longer
    /// current, so a duplicate delivery is discarded.
    pub fn resolve(&mut self, token: RequestToken) -> bool {
        if self.is_current(token) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Invalidate every outstanding token
    pub fn invalidate_all(&mut self) {
        if let Some(token) = self.current.take() {
            tracing::debug!("Request {} invalidated", token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_token_wins() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert!(!tracker.resolve(first));
        assert!(tracker.resolve(second));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_resolved_token_is_not_applied_twice() {
        let mut tracker = RequestTracker::new();
        let token = tracker.issue();
        assert!(tracker.resolve(token));
        assert!(!tracker.resolve(token));
    }

    #[test]
    fn test_invalidate_all() {
        let mut tracker = RequestTracker::new();
        let token = tracker.issue();
        tracker.invalidate_all();
        assert!(!tracker.is_current(token));

        // New tokens after invalidation are distinct from the old ones
        let next = tracker.issue();
        assert!(next > token);
        assert!(tracker.is_current(next));
    }
}
