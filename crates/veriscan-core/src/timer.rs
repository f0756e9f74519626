#![forbid(unsafe_code)]

//! One-shot timers with cancellation tokens.
//!
//! A [`TimerSlot`] holds at most one armed countdown. Arming mints a fresh
//! [`TimerToken`]; re-arming or cancelling invalidates the previous token.
//! The slot fires through [`tick`](TimerSlot::tick), which returns the token
//! of the countdown that just expired. Callers compare it (and their own
//! state) before acting, so a countdown armed by a state the machine has
//! since left can never mutate anything.
//!
//! # Invariants
//!
//! 1. At most one countdown is armed per slot at any time.
//! 2. Every `arm` returns a token never returned before by this slot.
//! 3. A token fires at most once; after firing the slot is disarmed.
//! 4. `cancel` guarantees the cancelled token is never reported by `tick`.
//!
//! # Failure Modes
//!
//! - Arming with `Duration::ZERO`: the countdown expires on the next `tick`,
//!   even a zero-duration one.
//! - `tick` on a disarmed slot: returns `None`, no other effect.

use std::time::Duration;

/// Identity of one armed countdown.
///
/// Tokens are unique per [`TimerSlot`] across its whole lifetime, so a
/// stored token can be compared against a fired one even after the slot has
/// been re-armed many times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// An armed countdown.
#[derive(Debug, Clone, Copy)]
struct Armed {
    token: TimerToken,
    remaining: Duration,
}

/// Holder for at most one pending one-shot countdown.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    armed: Option<Armed>,
    next: u64,
}

impl TimerSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a countdown that expires after `after`.
    ///
    /// Any previously armed countdown is replaced; its token is invalidated.
    pub fn arm(&mut self, after: Duration) -> TimerToken {
        let token = TimerToken(self.next);
        self.next += 1;
        self.armed = Some(Armed {
            token,
            remaining: after,
        });
        token
    }

    /// Cancel the armed countdown, if any.
    ///
    /// Returns the invalidated token. The cancelled countdown will never be
    /// reported by [`tick`](Self::tick).
    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.armed.take().map(|a| a.token)
    }

    /// Whether a countdown is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Token of the armed countdown, if any.
    #[must_use]
    pub fn armed_token(&self) -> Option<TimerToken> {
        self.armed.map(|a| a.token)
    }

    /// Time left on the armed countdown, if any.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.armed.map(|a| a.remaining)
    }

    /// Advance the countdown by `dt`.
    ///
    /// Returns the token of the countdown that expired during this tick, or
    /// `None`. Expiry disarms the slot, so a token is reported exactly once.
    pub fn tick(&mut self, dt: Duration) -> Option<TimerToken> {
        let armed = self.armed.as_mut()?;
        armed.remaining = armed.remaining.saturating_sub(dt);
        if armed.remaining.is_zero() {
            self.armed.take().map(|a| a.token)
        } else {
            None
        }
    }
}
