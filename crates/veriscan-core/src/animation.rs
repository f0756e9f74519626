#![forbid(unsafe_code)]

//! Composable animation primitives.
//!
//! Time-based animations that produce normalized `f32` values (0.0–1.0),
//! advanced by explicit `tick(dt)` calls from the event loop. The page uses
//! these for section fade-ins; the stagger helpers compute the per-item
//! delay offsets for batches that become visible together.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);

    /// Time elapsed past completion, forwarded by composition types.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Elapsed time is tracked as [`Duration`] for precise accumulation across
/// many small ticks.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Builder: set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

// ---------------------------------------------------------------------------
// Delayed
// ---------------------------------------------------------------------------

/// Wait for a delay, then play the inner animation.
///
/// Overshoot past the delay boundary is forwarded into the inner animation,
/// so coarse ticks don't stretch the total duration.
#[derive(Debug, Clone, Copy)]
pub struct Delayed<A> {
    delay: Duration,
    elapsed: Duration,
    inner: A,
    started: bool,
}

impl<A: Animation> Delayed<A> {
    /// Create a delayed animation that waits `delay` before starting `inner`.
    pub fn new(delay: Duration, inner: A) -> Self {
        Self {
            delay,
            elapsed: Duration::ZERO,
            inner,
            started: false,
        }
    }

    /// Whether the delay has elapsed and the inner animation has started.
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Access the inner animation.
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn tick(&mut self, dt: Duration) {
        if !self.started {
            self.elapsed = self.elapsed.saturating_add(dt);
            if self.elapsed >= self.delay {
                self.started = true;
                let overshoot = self.elapsed.saturating_sub(self.delay);
                if !overshoot.is_zero() {
                    self.inner.tick(overshoot);
                }
            }
        } else {
            self.inner.tick(dt);
        }
    }

    fn is_complete(&self) -> bool {
        self.started && self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        if self.started { self.inner.value() } else { 0.0 }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.started = false;
        self.inner.reset();
    }

    fn overshoot(&self) -> Duration {
        if self.started {
            self.inner.overshoot()
        } else {
            Duration::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Stagger offsets
// ---------------------------------------------------------------------------

/// Delay offsets for a batch of simultaneously triggered animations.
///
/// Offset `i` is `i * step`: the first item starts immediately, each later
/// item waits one more step. A batch of one gets `[Duration::ZERO]`; an
/// empty batch gets an empty vec. Exact integer arithmetic, no float drift.
#[must_use]
pub fn stagger_offsets(count: usize, step: Duration) -> Vec<Duration> {
    (0..count)
        .map(|i| step.saturating_mul(i as u32))
        .collect()
}

/// The stagger offset for one item at `index` within its batch.
#[must_use]
pub fn stagger_offset(index: usize, step: Duration) -> Duration {
    step.saturating_mul(index as u32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);
    const MS_400: Duration = Duration::from_millis(400);

    // ---- Easing ----

    #[test]
    fn easing_endpoints() {
        assert!((linear(0.0) - 0.0).abs() < f32::EPSILON);
        assert!((linear(1.0) - 1.0).abs() < f32::EPSILON);
        assert!((ease_in(1.0) - 1.0).abs() < f32::EPSILON);
        assert!((ease_out(1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn easing_clamps_input() {
        assert!((linear(-1.0) - 0.0).abs() < f32::EPSILON);
        assert!((linear(2.0) - 1.0).abs() < f32::EPSILON);
        assert!((ease_out(1.5) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ease_out_front_loads_progress() {
        assert!(ease_out(0.5) > linear(0.5));
        assert!(ease_in(0.5) < linear(0.5));
    }

    // ---- Fade ----

    #[test]
    fn fade_starts_at_zero() {
        let fade = Fade::new(MS_400);
        assert!((fade.value() - 0.0).abs() < f32::EPSILON);
        assert!(!fade.is_complete());
    }

    #[test]
    fn fade_completes_after_duration() {
        let mut fade = Fade::new(MS_400);
        fade.tick(MS_400);
        assert!(fade.is_complete());
        assert!((fade.value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fade_midpoint_linear() {
        let mut fade = Fade::new(MS_400);
        fade.tick(MS_200);
        assert!((fade.value() - 0.5).abs() < 0.01);
    }

    #[test]
    fn fade_with_ease_out() {
        let mut fade = Fade::new(MS_400).easing(ease_out);
        fade.tick(MS_200);
        // ease_out(0.5) = 0.75
        assert!((fade.value() - 0.75).abs() < 0.01);
    }

    #[test]
    fn fade_clamps_overshoot() {
        let mut fade = Fade::new(MS_100);
        fade.tick(Duration::from_secs(5));
        assert!((fade.value() - 1.0).abs() < f32::EPSILON);
        assert_eq!(fade.overshoot(), Duration::from_millis(4900));
    }

    #[test]
    fn fade_zero_duration_does_not_panic() {
        let mut fade = Fade::new(Duration::ZERO);
        fade.tick(Duration::from_millis(1));
        assert!(fade.is_complete());
    }

    #[test]
    fn fade_reset() {
        let mut fade = Fade::new(MS_100);
        fade.tick(MS_100);
        fade.reset();
        assert!(!fade.is_complete());
        assert!((fade.value() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fade_incremental_ticks() {
        let mut fade = Fade::new(MS_200);
        for _ in 0..4 {
            fade.tick(MS_50);
        }
        assert!(fade.is_complete());
    }

    // ---- Delayed ----

    #[test]
    fn delayed_waits_then_plays() {
        let mut anim = Delayed::new(MS_100, Fade::new(MS_100));

        anim.tick(MS_50);
        assert!(!anim.has_started());
        assert!((anim.value() - 0.0).abs() < f32::EPSILON);

        anim.tick(MS_50);
        assert!(anim.has_started());

        anim.tick(MS_100);
        assert!(anim.is_complete());
        assert!((anim.value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn delayed_forwards_overshoot() {
        let mut anim = Delayed::new(MS_100, Fade::new(MS_400));
        anim.tick(MS_200); // 100ms past the delay
        assert!(anim.has_started());
        assert!((anim.inner().value() - 0.25).abs() < 0.02);
    }

    #[test]
    fn delayed_reset() {
        let mut anim = Delayed::new(MS_50, Fade::new(MS_50));
        anim.tick(MS_200);
        assert!(anim.is_complete());
        anim.reset();
        assert!(!anim.has_started());
        assert!(!anim.is_complete());
    }

    // ---- Stagger ----

    #[test]
    fn stagger_empty_batch() {
        assert!(stagger_offsets(0, MS_50).is_empty());
    }

    #[test]
    fn stagger_single_item_is_immediate() {
        assert_eq!(stagger_offsets(1, MS_50), vec![Duration::ZERO]);
    }

    #[test]
    fn stagger_linear_spacing() {
        let offsets = stagger_offsets(4, MS_50);
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                MS_50,
                Duration::from_millis(100),
                Duration::from_millis(150),
            ]
        );
    }

    #[test]
    fn stagger_zero_step_all_immediate() {
        let offsets = stagger_offsets(5, Duration::ZERO);
        assert!(offsets.iter().all(|d| d.is_zero()));
    }

    #[test]
    fn stagger_offset_matches_batch() {
        for i in 0..8 {
            assert_eq!(stagger_offset(i, MS_50), stagger_offsets(8, MS_50)[i]);
        }
    }
}
