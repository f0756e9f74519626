#![forbid(unsafe_code)]

//! The demo scan dialog.
//!
//! A modal overlay simulating a product-authentication scan. The lifecycle
//! is a three-phase machine (Closed, Scanning, Result) with one extra
//! in-flight condition: a closing transition that detaches the surface a
//! fixed delay after [`close`](ScanDialog::close) is called.
//!
//! All waiting goes through [`TimerSlot`]s advanced by
//! [`tick`](ScanDialog::tick). Cancellation is double-guarded: `close`
//! cancels the scan countdown's token, and the firing path re-checks the
//! phase before acting, so a scan completion can never surface after the
//! user has already dismissed the dialog.
//!
//! # Invariants
//!
//! 1. At most one dialog surface is attached at any instant (single
//!    overlay slot; `open` while open is a no-op).
//! 2. The dialog's style tokens are installed once per process, keyed by
//!    [`STYLE_GROUP`], regardless of how many open/close cycles run.
//! 3. The Escape subscription acquired at open is released on every
//!    teardown path; repeated cycles leave the key router empty.
//! 4. Focus lands on the close control at open and returns to the
//!    previously focused node at teardown iff it is still attached.
//! 5. Re-entrant `close` (and `close` with nothing open) is a no-op.

use std::time::Duration;

use tracing::{debug, trace, warn};
use veriscan_core::event::{KeyCode, KeyEvent, MouseEvent, MouseKind};
use veriscan_core::geometry::Rect;
use veriscan_core::timer::TimerSlot;

use crate::focus::{FocusId, FocusRegistry};
use crate::keys::{KeyRouter, KeySubscription};
use crate::overlay::{OverlayHost, OverlaySurface, PresentationError, SurfaceId};
use crate::theme::{Color, Theme};

/// Stable identifier for the dialog's one-time style token group.
pub const STYLE_GROUP: &str = "scan-dialog";

/// Id of the heading node that labels the dialog surface.
pub const TITLE_ID: &str = "scan-dialog.title";

/// Style tokens installed by the dialog on first open.
///
/// The brand tokens ("primary", "success") are deliberately absent: those
/// belong to the page theme and are only referenced by name at render time.
const DIALOG_TOKENS: &[(&str, Color)] = &[
    ("scan-dialog.backdrop", Color::rgb(16, 16, 20)),
    ("scan-dialog.panel", Color::rgb(250, 250, 250)),
    ("scan-dialog.close", Color::rgb(102, 102, 102)),
];

/// Focus id of the dialog's close control.
#[must_use]
pub fn close_control_id() -> FocusId {
    FocusId::new("scan-dialog.close")
}

/// Focus id of the "scan another" action shown in the Result phase.
#[must_use]
pub fn scan_another_id() -> FocusId {
    FocusId::new("scan-dialog.scan-another")
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing configuration for the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanDialogConfig {
    /// How long the simulated scan runs before showing the result.
    pub scan_duration: Duration,
    /// Length of the closing transition before the surface detaches.
    pub close_duration: Duration,
}

impl Default for ScanDialogConfig {
    fn default() -> Self {
        Self {
            scan_duration: Duration::from_millis(3000),
            close_duration: Duration::from_millis(300),
        }
    }
}

impl ScanDialogConfig {
    /// Builder: set the simulated scan duration.
    #[must_use]
    pub fn scan_duration(mut self, duration: Duration) -> Self {
        self.scan_duration = duration;
        self
    }

    /// Builder: set the closing-transition duration.
    #[must_use]
    pub fn close_duration(mut self, duration: Duration) -> Self {
        self.close_duration = duration;
        self
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Lifecycle phase of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPhase {
    /// No dialog is presented.
    #[default]
    Closed,
    /// The simulated scan is running.
    Scanning,
    /// The scan finished; the result view is shown.
    Result,
}

/// Lifecycle event, queued during transitions and drained by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// The dialog surface was attached and the scan started.
    Opened,
    /// The simulated scan finished.
    ScanCompleted,
    /// "Scan another" restarted the scan from the result view.
    Rearmed,
    /// The closing transition started.
    CloseBegan,
    /// The surface was detached and focus restored.
    Closed,
}

/// Shared page resources the dialog borrows for each operation.
pub struct DialogHost<'a> {
    /// The single modal overlay slot.
    pub overlays: &'a mut OverlayHost,
    /// Focus registry for record/restore and the close control.
    pub focus: &'a mut FocusRegistry,
    /// Router the scoped Escape subscription is acquired from.
    pub keys: &'a mut KeyRouter,
    /// Style token registry for the one-time injection.
    pub theme: &'a mut Theme,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Hit-test rectangles for the presented dialog, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    /// The full-viewport backdrop.
    pub backdrop: Rect,
    /// The content panel. Clicks here do not dismiss the dialog.
    pub panel: Rect,
    /// The close control in the panel's top-right corner.
    pub close_button: Rect,
    /// The scanner frame region (Scanning phase visual).
    pub scanner: Rect,
    /// The "scan another" action (Result phase visual).
    pub action_button: Rect,
}

/// Compute the dialog layout for a viewport.
///
/// The panel takes 90% of the viewport width capped at 50 columns, centered
/// both ways. Degenerate viewports produce degenerate (possibly empty)
/// rects; hit testing on an empty rect simply never matches.
#[must_use]
pub fn layout(viewport: Rect) -> DialogLayout {
    let panel_w = (u32::from(viewport.width) * 9 / 10).min(50) as u16;
    let panel_h = viewport.height.saturating_sub(4).min(14);
    let panel = Rect::new(
        viewport.x.saturating_add((viewport.width - panel_w) / 2),
        viewport.y.saturating_add((viewport.height - panel_h) / 2),
        panel_w,
        panel_h,
    );

    let close_button = Rect::new(
        panel.right().saturating_sub(4),
        panel.y.saturating_add(1),
        3.min(panel.width),
        1.min(panel.height),
    );

    let scanner = Rect::new(
        panel.x.saturating_add(2),
        panel.y.saturating_add(3),
        panel.width.saturating_sub(4),
        panel.height.saturating_sub(6),
    );

    let action_button = Rect::new(
        panel.x.saturating_add(2),
        panel.bottom().saturating_sub(2),
        16.min(panel.width.saturating_sub(4)),
        1.min(panel.height),
    );

    DialogLayout {
        backdrop: viewport,
        panel,
        close_button,
        scanner,
        action_button,
    }
}

// ---------------------------------------------------------------------------
// ScanDialog
// ---------------------------------------------------------------------------

/// State machine for the demo scan dialog.
///
/// The page constructs exactly one instance and calls `open`, `reset`, and
/// `close` from its update loop; there are no ambient entry points.
#[derive(Debug, Default)]
pub struct ScanDialog {
    config: ScanDialogConfig,
    phase: DialogPhase,
    surface: Option<SurfaceId>,
    scan_timer: TimerSlot,
    close_timer: TimerSlot,
    esc_scope: Option<KeySubscription>,
    previously_focused: Option<FocusId>,
    events: Vec<DialogEvent>,
}

impl ScanDialog {
    /// Create a dialog with the given timing configuration.
    #[must_use]
    pub fn new(config: ScanDialogConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    /// Whether a dialog surface is currently presented.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    /// Whether the closing transition is in flight.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.close_timer.is_armed()
    }

    /// Time left on the simulated scan, if one is running.
    #[must_use]
    pub fn scan_remaining(&self) -> Option<Duration> {
        self.scan_timer.remaining()
    }

    /// Drain queued lifecycle events.
    pub fn drain_events(&mut self) -> Vec<DialogEvent> {
        std::mem::take(&mut self.events)
    }

    /// Present the dialog and start the simulated scan.
    ///
    /// No-op (`Ok`) if a dialog is already open: the single-instance guard
    /// means repeated invocations can never stack surfaces, style groups,
    /// or key subscriptions. Fails with [`PresentationError`] if the
    /// overlay slot is held by another surface; nothing is attached or
    /// mutated in that case.
    pub fn open(&mut self, host: &mut DialogHost<'_>) -> Result<(), PresentationError> {
        if self.phase != DialogPhase::Closed {
            trace!(phase = ?self.phase, "open ignored: dialog already presented");
            return Ok(());
        }

        // The surface attach goes first: if it fails there is no partial
        // state to unwind.
        let surface = match host.overlays.attach(OverlaySurface::dialog(TITLE_ID)) {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "demo dialog could not be presented");
                return Err(err);
            }
        };

        host.theme.install_once(STYLE_GROUP, DIALOG_TOKENS);

        self.previously_focused = host.focus.current().cloned();
        host.focus.attach(close_control_id());
        host.focus.attach(scan_another_id());
        host.focus.focus(&close_control_id());

        self.esc_scope = Some(host.keys.subscribe(KeyCode::Escape));
        self.scan_timer.arm(self.config.scan_duration);
        self.surface = Some(surface);
        self.phase = DialogPhase::Scanning;
        self.events.push(DialogEvent::Opened);
        debug!(scan_ms = self.config.scan_duration.as_millis() as u64, "demo dialog opened");
        Ok(())
    }

    /// Restart the scan from the result view.
    ///
    /// Only valid in the Result phase; anywhere else (Scanning, Closed, or
    /// mid-close) this is a no-op.
    pub fn reset(&mut self) {
        if self.phase != DialogPhase::Result || self.is_closing() {
            trace!(phase = ?self.phase, "reset ignored");
            return;
        }
        self.phase = DialogPhase::Scanning;
        self.scan_timer.arm(self.config.scan_duration);
        self.events.push(DialogEvent::Rearmed);
        debug!("demo dialog re-armed for another scan");
    }

    /// Begin the closing transition.
    ///
    /// Hard-cancels any pending scan countdown immediately. Safe to call
    /// with nothing open, and re-entrant calls while the transition is in
    /// flight do not arm a second teardown.
    pub fn close(&mut self) {
        if self.phase == DialogPhase::Closed {
            trace!("close ignored: no dialog presented");
            return;
        }
        if self.is_closing() {
            trace!("close ignored: teardown already pending");
            return;
        }
        self.scan_timer.cancel();
        self.close_timer.arm(self.config.close_duration);
        self.events.push(DialogEvent::CloseBegan);
        debug!(close_ms = self.config.close_duration.as_millis() as u64, "demo dialog closing");
    }

    /// Advance the dialog's timers.
    ///
    /// Both firing paths are phase-guarded: a scan completion only lands in
    /// Scanning with no close pending, and the teardown only runs when its
    /// own countdown fires.
    pub fn tick(&mut self, dt: Duration, host: &mut DialogHost<'_>) {
        if let Some(token) = self.scan_timer.tick(dt) {
            if self.phase == DialogPhase::Scanning && !self.is_closing() {
                self.phase = DialogPhase::Result;
                self.events.push(DialogEvent::ScanCompleted);
                debug!("simulated scan completed");
            } else {
                trace!(?token, phase = ?self.phase, "stale scan completion ignored");
            }
        }

        if self.close_timer.tick(dt).is_some() {
            self.teardown(host);
        }
    }

    /// Route a key event through the dialog's scoped subscriptions.
    ///
    /// Returns `true` if the event was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent, host: &mut DialogHost<'_>) -> bool {
        let Some(scope) = self.esc_scope else {
            return false;
        };
        if host.keys.dispatch(key).contains(&scope) {
            self.close();
            true
        } else {
            false
        }
    }

    /// Handle a mouse event while the dialog is presented.
    ///
    /// A press on the close control or on the backdrop (outside the content
    /// panel) closes; a press on the "scan another" action in the Result
    /// phase re-arms. Everything else is swallowed while the dialog is up,
    /// since it is modal. Returns `true` if the event was consumed.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent, viewport: Rect) -> bool {
        if !self.is_open() {
            return false;
        }
        if mouse.kind != MouseKind::Down {
            return true;
        }

        let layout = layout(viewport);
        if layout.close_button.contains(mouse.x, mouse.y) {
            self.close();
        } else if layout.action_button.contains(mouse.x, mouse.y)
            && self.phase == DialogPhase::Result
        {
            self.reset();
        } else if !layout.panel.contains(mouse.x, mouse.y) {
            // A click landing exactly on the backdrop dismisses.
            self.close();
        }
        true
    }

    /// Detach the surface and release everything acquired at open.
    fn teardown(&mut self, host: &mut DialogHost<'_>) {
        if let Some(surface) = self.surface.take() {
            host.overlays.detach(surface);
        }
        if let Some(scope) = self.esc_scope.take() {
            host.keys.release(scope);
        }
        host.focus.detach(&close_control_id());
        host.focus.detach(&scan_another_id());
        if let Some(previous) = self.previously_focused.take() {
            if host.focus.is_attached(&previous) {
                host.focus.focus(&previous);
            }
        }
        self.phase = DialogPhase::Closed;
        self.events.push(DialogEvent::Closed);
        debug!("demo dialog surface detached");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
