#![forbid(unsafe_code)]

//! Scoped key subscriptions.
//!
//! Transient surfaces (the demo dialog, the nav menu) want a key handled
//! only while they are up. Instead of each installing and removing an
//! ambient listener, they acquire a [`KeySubscription`] from the router on
//! open and release it on close. The router's subscription count is
//! observable, so tests can assert that repeated open/close cycles leak
//! nothing.
//!
//! Dispatch returns subscribers most-recent-first: the innermost transient
//! surface wins when two scopes watch the same key.

use veriscan_core::event::{KeyCode, KeyEvent};

/// Handle for one scoped key subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySubscription(u64);

/// Router for scoped key subscriptions.
#[derive(Debug, Default)]
pub struct KeyRouter {
    subs: Vec<(KeySubscription, KeyCode)>,
    next: u64,
}

impl KeyRouter {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a key. The subscription stays active until released.
    pub fn subscribe(&mut self, code: KeyCode) -> KeySubscription {
        let sub = KeySubscription(self.next);
        self.next += 1;
        self.subs.push((sub, code));
        sub
    }

    /// Release a subscription. Returns `true` if it was active.
    ///
    /// Releasing twice is a no-op.
    pub fn release(&mut self, sub: KeySubscription) -> bool {
        let len_before = self.subs.len();
        self.subs.retain(|(s, _)| *s != sub);
        self.subs.len() < len_before
    }

    /// Subscriptions watching this key, most-recent-first.
    #[must_use]
    pub fn dispatch(&self, key: &KeyEvent) -> Vec<KeySubscription> {
        self.subs
            .iter()
            .rev()
            .filter(|(_, code)| *code == key.code)
            .map(|(sub, _)| *sub)
            .collect()
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Whether no subscriptions are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn esc() -> KeyEvent {
        KeyEvent::new(KeyCode::Escape)
    }

    #[test]
    fn dispatch_matches_code() {
        let mut router = KeyRouter::new();
        let sub = router.subscribe(KeyCode::Escape);
        assert_eq!(router.dispatch(&esc()), vec![sub]);
        assert!(router.dispatch(&KeyEvent::new(KeyCode::Enter)).is_empty());
    }

    #[test]
    fn release_removes_subscription() {
        let mut router = KeyRouter::new();
        let sub = router.subscribe(KeyCode::Escape);
        assert!(router.release(sub));
        assert!(router.dispatch(&esc()).is_empty());
        assert!(router.is_empty());
    }

    #[test]
    fn double_release_is_noop() {
        let mut router = KeyRouter::new();
        let sub = router.subscribe(KeyCode::Escape);
        assert!(router.release(sub));
        assert!(!router.release(sub));
    }

    #[test]
    fn most_recent_subscriber_first() {
        let mut router = KeyRouter::new();
        let outer = router.subscribe(KeyCode::Escape);
        let inner = router.subscribe(KeyCode::Escape);
        assert_eq!(router.dispatch(&esc()), vec![inner, outer]);
    }

    #[test]
    fn handles_are_unique_across_cycles() {
        let mut router = KeyRouter::new();
        let first = router.subscribe(KeyCode::Escape);
        router.release(first);
        let second = router.subscribe(KeyCode::Escape);
        assert_ne!(first, second);
        // Releasing the stale handle must not remove the new subscription.
        assert!(!router.release(first));
        assert_eq!(router.len(), 1);
        assert_eq!(router.dispatch(&esc()), vec![second]);
    }
}
