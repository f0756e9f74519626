#![forbid(unsafe_code)]

//! One-shot staggered section reveals.
//!
//! Page sections start hidden and fade in the first time they become
//! visible. The [`RevealScheduler`] watches a fixed set of registered
//! sections; [`observe`](RevealScheduler::observe) is the polling analogue
//! of a host visibility-notification batch, and [`tick`](RevealScheduler::tick)
//! drives the stagger delays and fade transitions.
//!
//! # Invariants
//!
//! 1. A section is revealed at most once; `revealed` is monotonic and the
//!    reveal transition never replays, no matter how visibility changes
//!    afterwards.
//! 2. Observation stops at scheduling time, not when the delayed reveal
//!    fires: a rapid visible/hidden/visible flip before the stagger delay
//!    elapses cannot schedule a second reveal.
//! 3. Stagger index is the position within the current batch (including
//!    non-intersecting batch entries), not a global counter.
//! 4. On a host without viewport observation, every registered section is
//!    revealed immediately with no animation. Content never stays hidden.

use std::time::Duration;

use tracing::{debug, trace, warn};
use veriscan_core::animation::{Animation, Delayed, Fade, ease_out, stagger_offset};
use veriscan_core::capability::HostCapabilities;
use veriscan_core::geometry::Rect;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Identifier for a registered section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(pub u64);

impl SectionId {
    /// Create a section id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Viewport-observation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverConfig {
    /// Fraction of a section that must be visible to count as intersecting.
    pub threshold: f32,
    /// Rows trimmed off the bottom of the viewport before the visibility
    /// check, so sections reveal slightly before fully scrolled in view.
    pub root_margin_bottom: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_bottom: 3,
        }
    }
}

impl ObserverConfig {
    /// Builder: set the intersection threshold.
    #[must_use]
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builder: set the bottom viewport margin.
    #[must_use]
    pub fn root_margin_bottom(mut self, rows: u16) -> Self {
        self.root_margin_bottom = rows;
        self
    }
}

/// One entry of a visibility-notification batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEvent {
    /// The section whose intersection state changed.
    pub id: SectionId,
    /// Whether the section now intersects the (margin-adjusted) viewport.
    pub is_intersecting: bool,
}

/// Reveal lifecycle event, queued and drained by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// A reveal was scheduled with the given stagger delay.
    Scheduled {
        /// The section.
        id: SectionId,
        /// Delay until the reveal fires.
        delay: Duration,
    },
    /// The section became revealed and its fade-in started.
    Revealed {
        /// The section.
        id: SectionId,
    },
}

/// The host cannot report viewport intersections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedEnvironmentError;

impl std::fmt::Display for UnsupportedEnvironmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "viewport observation unavailable in this host")
    }
}

impl std::error::Error for UnsupportedEnvironmentError {}

/// A section registered for a one-shot reveal.
///
/// `anim` is populated exactly once, at scheduling time: a stagger delay
/// wrapping the fade-in. `revealed` flips when the delay elapses.
#[derive(Debug)]
struct Watched {
    id: SectionId,
    bounds: Rect,
    revealed: bool,
    observing: bool,
    last_intersecting: Option<bool>,
    anim: Option<Delayed<Fade>>,
}

// ---------------------------------------------------------------------------
// RevealScheduler
// ---------------------------------------------------------------------------

/// Watches registered sections and reveals each exactly once.
#[derive(Debug)]
pub struct RevealScheduler {
    observer: ObserverConfig,
    stagger_step: Duration,
    fade_duration: Duration,
    watched: Vec<Watched>,
    events: Vec<RevealEvent>,
}

impl RevealScheduler {
    /// Create a scheduler with the given observation configuration.
    #[must_use]
    pub fn new(observer: ObserverConfig) -> Self {
        Self {
            observer,
            stagger_step: Duration::from_millis(50),
            fade_duration: Duration::from_millis(400),
            watched: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Builder: set the per-item stagger step.
    #[must_use]
    pub fn stagger_step(mut self, step: Duration) -> Self {
        self.stagger_step = step;
        self
    }

    /// Builder: set the fade-in duration.
    #[must_use]
    pub fn fade_duration(mut self, duration: Duration) -> Self {
        self.fade_duration = duration;
        self
    }

    /// Register sections for observation.
    ///
    /// Sections already registered (watched or revealed) are skipped. On a
    /// host without viewport observation every newly registered section is
    /// revealed immediately, with no animation; the degraded path must
    /// never leave content hidden.
    pub fn register<I>(&mut self, sections: I, caps: &HostCapabilities)
    where
        I: IntoIterator<Item = (SectionId, Rect)>,
    {
        let supported = caps.viewport_observation;
        let mut degraded = 0usize;

        for (id, bounds) in sections {
            if self.watched.iter().any(|w| w.id == id) {
                trace!(section = id.0, "register skipped: already watched");
                continue;
            }
            if supported {
                self.watched.push(Watched {
                    id,
                    bounds,
                    revealed: false,
                    observing: true,
                    last_intersecting: None,
                    anim: None,
                });
            } else {
                self.watched.push(Watched {
                    id,
                    bounds,
                    revealed: true,
                    observing: false,
                    last_intersecting: None,
                    anim: None,
                });
                self.events.push(RevealEvent::Revealed { id });
                degraded += 1;
            }
        }

        if degraded > 0 {
            warn!(
                error = %UnsupportedEnvironmentError,
                sections = degraded,
                "revealing sections immediately without animation"
            );
        }
    }

    /// Process a viewport change.
    ///
    /// Builds the notification batch (every still-observed section whose
    /// intersection state changed, or whose initial notification is
    /// pending, in registration order) and schedules a staggered reveal
    /// for each intersecting, not-yet-revealed entry. Observation for a
    /// scheduled section stops here, before its delay elapses.
    pub fn observe(&mut self, viewport: Rect) {
        let effective = viewport.shrink_bottom(self.observer.root_margin_bottom);
        let threshold = self.observer.threshold;

        let batch: Vec<(usize, VisibilityEvent)> = self
            .watched
            .iter()
            .enumerate()
            .filter(|(_, w)| w.observing)
            .filter_map(|(idx, w)| {
                let is_intersecting = w.bounds.covered_ratio(&effective) >= threshold;
                if w.last_intersecting == Some(is_intersecting) {
                    return None;
                }
                Some((
                    idx,
                    VisibilityEvent {
                        id: w.id,
                        is_intersecting,
                    },
                ))
            })
            .collect();

        for (batch_index, (idx, event)) in batch.into_iter().enumerate() {
            let entry = &mut self.watched[idx];
            if event.is_intersecting && !entry.revealed {
                let delay = stagger_offset(batch_index, self.stagger_step);
                entry.anim = Some(Delayed::new(
                    delay,
                    Fade::new(self.fade_duration).easing(ease_out),
                ));
                entry.observing = false;
                entry.last_intersecting = Some(true);
                self.events.push(RevealEvent::Scheduled {
                    id: entry.id,
                    delay,
                });
                trace!(
                    section = entry.id.0,
                    delay_ms = delay.as_millis() as u64,
                    "reveal scheduled"
                );
            } else {
                entry.last_intersecting = Some(event.is_intersecting);
            }
        }
    }

    /// Advance stagger delays and fade transitions.
    pub fn tick(&mut self, dt: Duration) {
        for entry in &mut self.watched {
            let Some(anim) = entry.anim.as_mut() else {
                continue;
            };
            if !anim.is_complete() {
                anim.tick(dt);
            }
            if !entry.revealed && anim.has_started() {
                entry.revealed = true;
                self.events.push(RevealEvent::Revealed { id: entry.id });
                debug!(section = entry.id.0, "section revealed");
            }
        }
    }

    /// Whether a section has been revealed.
    #[must_use]
    pub fn is_revealed(&self, id: SectionId) -> bool {
        self.watched.iter().any(|w| w.id == id && w.revealed)
    }

    /// Fade-in progress of a section: 0.0 while hidden, 1.0 once settled.
    #[must_use]
    pub fn progress(&self, id: SectionId) -> f32 {
        match self.watched.iter().find(|w| w.id == id) {
            Some(w) if w.revealed => w.anim.as_ref().map_or(1.0, |anim| anim.value()),
            _ => 0.0,
        }
    }

    /// Number of sections still under observation.
    #[must_use]
    pub fn observing_count(&self) -> usize {
        self.watched.iter().filter(|w| w.observing).count()
    }

    /// Number of reveals still waiting out their stagger delay.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.watched
            .iter()
            .filter(|w| w.anim.is_some() && !w.revealed)
            .count()
    }

    /// Number of registered sections.
    #[must_use]
    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }

    /// Drain queued reveal events.
    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.events)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);

    fn scheduler() -> RevealScheduler {
        RevealScheduler::new(ObserverConfig::default().root_margin_bottom(0))
    }

    fn section(n: u64) -> SectionId {
        SectionId::new(n)
    }

    /// Three stacked sections, each 10 rows tall, 80 wide.
    fn stacked_sections() -> Vec<(SectionId, Rect)> {
        (0..3)
            .map(|n| (section(n), Rect::new(0, n as u16 * 10, 80, 10)))
            .collect()
    }

    fn revealed_ids(events: &[RevealEvent]) -> Vec<SectionId> {
        events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::Revealed { id } => Some(*id),
                RevealEvent::Scheduled { .. } => None,
            })
            .collect()
    }

    #[test]
    fn register_skips_duplicates() {
        let mut sched = scheduler();
        let caps = HostCapabilities::full();
        sched.register(stacked_sections(), &caps);
        sched.register(stacked_sections(), &caps);
        assert_eq!(sched.watched_len(), 3);
    }

    #[test]
    fn unsupported_host_reveals_immediately() {
        let mut sched = scheduler();
        sched.register(
            stacked_sections(),
            &HostCapabilities::without_viewport_observation(),
        );

        for n in 0..3 {
            assert!(sched.is_revealed(section(n)));
            assert!((sched.progress(section(n)) - 1.0).abs() < f32::EPSILON);
        }
        assert_eq!(sched.observing_count(), 0);
        assert_eq!(sched.pending_count(), 0);

        let events = sched.drain_events();
        assert_eq!(revealed_ids(&events).len(), 3);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, RevealEvent::Scheduled { .. }))
        );
    }

    #[test]
    fn initial_batch_staggers_in_order() {
        let mut sched = scheduler();
        sched.register(stacked_sections(), &HostCapabilities::full());

        // All three sections fit the viewport: one batch of three.
        sched.observe(Rect::from_size(80, 30));
        let events = sched.drain_events();
        assert_eq!(
            events,
            vec![
                RevealEvent::Scheduled {
                    id: section(0),
                    delay: Duration::ZERO
                },
                RevealEvent::Scheduled {
                    id: section(1),
                    delay: MS_50
                },
                RevealEvent::Scheduled {
                    id: section(2),
                    delay: Duration::from_millis(100)
                },
            ]
        );

        // Observation stopped at scheduling time, before any reveal fired.
        assert_eq!(sched.observing_count(), 0);
        assert_eq!(sched.pending_count(), 3);

        // Reveals fire in batch order, one stagger step apart.
        sched.tick(Duration::ZERO);
        assert_eq!(revealed_ids(&sched.drain_events()), vec![section(0)]);
        sched.tick(MS_50);
        assert_eq!(revealed_ids(&sched.drain_events()), vec![section(1)]);
        sched.tick(MS_50);
        assert_eq!(revealed_ids(&sched.drain_events()), vec![section(2)]);
    }

    #[test]
    fn batch_index_counts_non_intersecting_entries() {
        let mut sched = scheduler();
        // First section far below the fold, second one on screen.
        sched.register(
            vec![
                (section(0), Rect::new(0, 100, 80, 10)),
                (section(1), Rect::new(0, 0, 80, 10)),
            ],
            &HostCapabilities::full(),
        );

        sched.observe(Rect::from_size(80, 24));
        let events = sched.drain_events();
        // The off-screen entry occupies batch index 0, so the visible one
        // is staggered by one step.
        assert_eq!(
            events,
            vec![RevealEvent::Scheduled {
                id: section(1),
                delay: MS_50
            }]
        );
    }

    #[test]
    fn offscreen_section_schedules_when_scrolled_in() {
        let mut sched = scheduler();
        sched.register(
            vec![(section(0), Rect::new(0, 100, 80, 10))],
            &HostCapabilities::full(),
        );

        sched.observe(Rect::from_size(80, 24));
        assert!(sched.drain_events().is_empty());
        assert_eq!(sched.observing_count(), 1);

        // Scrolled down: the section enters the viewport alone, so its
        // batch index is zero and the reveal is immediate.
        sched.observe(Rect::new(0, 90, 80, 24));
        assert_eq!(
            sched.drain_events(),
            vec![RevealEvent::Scheduled {
                id: section(0),
                delay: Duration::ZERO
            }]
        );
    }

    #[test]
    fn rapid_visibility_flips_schedule_once() {
        let mut sched = scheduler();
        sched.register(
            vec![(section(0), Rect::new(0, 0, 80, 10))],
            &HostCapabilities::full(),
        );

        let on_screen = Rect::from_size(80, 24);
        let off_screen = Rect::new(0, 50, 80, 24);

        sched.observe(on_screen);
        // Flip away and back before the (zero-delay) reveal has fired.
        sched.observe(off_screen);
        sched.observe(on_screen);

        let events = sched.drain_events();
        let scheduled = events
            .iter()
            .filter(|e| matches!(e, RevealEvent::Scheduled { .. }))
            .count();
        assert_eq!(scheduled, 1);
        assert_eq!(sched.pending_count(), 1);

        sched.tick(Duration::ZERO);
        assert_eq!(revealed_ids(&sched.drain_events()), vec![section(0)]);
    }

    #[test]
    fn revealed_section_never_reanimates() {
        let mut sched = scheduler();
        sched.register(
            vec![(section(0), Rect::new(0, 0, 80, 10))],
            &HostCapabilities::full(),
        );

        sched.observe(Rect::from_size(80, 24));
        sched.tick(Duration::ZERO);
        sched.tick(Duration::from_secs(1));
        assert!(sched.is_revealed(section(0)));
        assert!((sched.progress(section(0)) - 1.0).abs() < f32::EPSILON);
        sched.drain_events();

        // Scroll away, back, away again: nothing new happens.
        sched.observe(Rect::new(0, 50, 80, 24));
        sched.observe(Rect::from_size(80, 24));
        sched.observe(Rect::new(0, 50, 80, 24));
        sched.tick(Duration::from_secs(1));

        assert!(sched.drain_events().is_empty());
        assert!((sched.progress(section(0)) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn threshold_gates_intersection() {
        let mut sched =
            RevealScheduler::new(ObserverConfig::default().threshold(0.25).root_margin_bottom(0));
        // 4-row section with exactly 1 row inside the viewport: ratio 0.25.
        sched.register(
            vec![(section(0), Rect::new(0, 23, 80, 4))],
            &HostCapabilities::full(),
        );

        sched.observe(Rect::from_size(80, 24));
        assert_eq!(
            sched.drain_events(),
            vec![RevealEvent::Scheduled {
                id: section(0),
                delay: Duration::ZERO
            }]
        );
    }

    #[test]
    fn below_threshold_does_not_schedule() {
        let mut sched =
            RevealScheduler::new(ObserverConfig::default().threshold(0.5).root_margin_bottom(0));
        sched.register(
            vec![(section(0), Rect::new(0, 23, 80, 4))],
            &HostCapabilities::full(),
        );

        sched.observe(Rect::from_size(80, 24));
        assert!(sched.drain_events().is_empty());
        assert_eq!(sched.observing_count(), 1);
    }

    #[test]
    fn root_margin_trims_viewport_bottom() {
        let bounds = Rect::new(0, 20, 80, 4);
        let caps = HostCapabilities::full();

        // Without margin the section intersects.
        let mut plain = RevealScheduler::new(ObserverConfig::default().root_margin_bottom(0));
        plain.register(vec![(section(0), bounds)], &caps);
        plain.observe(Rect::from_size(80, 24));
        assert_eq!(plain.pending_count(), 1);

        // A 4-row bottom margin pushes it out of the effective viewport.
        let mut margined = RevealScheduler::new(ObserverConfig::default().root_margin_bottom(4));
        margined.register(vec![(section(0), bounds)], &caps);
        margined.observe(Rect::from_size(80, 24));
        assert_eq!(margined.pending_count(), 0);
    }

    #[test]
    fn fade_progress_eases_in() {
        let mut sched = scheduler().fade_duration(Duration::from_millis(400));
        sched.register(
            vec![(section(0), Rect::new(0, 0, 80, 10))],
            &HostCapabilities::full(),
        );
        sched.observe(Rect::from_size(80, 24));
        sched.tick(Duration::ZERO);
        assert!(sched.is_revealed(section(0)));
        assert!((sched.progress(section(0)) - 0.0).abs() < f32::EPSILON);

        sched.tick(Duration::from_millis(200));
        // ease_out(0.5) = 0.75
        assert!((sched.progress(section(0)) - 0.75).abs() < 0.02);

        sched.tick(Duration::from_millis(200));
        assert!((sched.progress(section(0)) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_section_queries_are_inert() {
        let sched = scheduler();
        assert!(!sched.is_revealed(section(42)));
        assert_eq!(sched.progress(section(42)), 0.0);
    }

    #[test]
    fn empty_scheduler_is_inert() {
        let mut sched = scheduler();
        sched.observe(Rect::from_size(80, 24));
        sched.tick(Duration::from_secs(1));
        assert!(sched.drain_events().is_empty());
    }
}
