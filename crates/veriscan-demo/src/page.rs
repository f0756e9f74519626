#![forbid(unsafe_code)]

//! Page layout, scrolling, anchors, and the nav menu.
//!
//! The page is a fixed stack of sections in page coordinates under a
//! pinned header. Scrolling moves a viewport-sized window over that stack;
//! anchor jumps scroll a section's top edge to just below the header. An
//! unknown anchor is logged and abandoned; broken decoration never blocks
//! the rest of the page.

use tracing::{debug, warn};
use veriscan_core::geometry::Rect;
use veriscan_ui::focus::{FocusId, FocusRegistry};
use veriscan_ui::reveal::SectionId;

/// Rows reserved for the pinned header.
pub const HEADER_HEIGHT: u16 = 2;

/// Scroll offset past which the header renders elevated.
const HEADER_ELEVATION_SCROLL: u16 = 4;

/// Focus id of the nav menu toggle.
#[must_use]
pub fn nav_toggle_id() -> FocusId {
    FocusId::new("nav.toggle")
}

/// Focus id of the first nav link, focused when the menu opens.
#[must_use]
pub fn nav_first_link_id() -> FocusId {
    FocusId::new("nav.link.hero")
}

/// Focus id of the "launch demo" button in the demo section.
#[must_use]
pub fn demo_button_id() -> FocusId {
    FocusId::new("page.demo-button")
}

/// A referenced anchor does not exist on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTargetError {
    /// The anchor that failed to resolve.
    pub target: String,
}

impl std::fmt::Display for MissingTargetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scroll target not found: #{}", self.target)
    }
}

impl std::error::Error for MissingTargetError {}

/// One section of the page.
#[derive(Debug, Clone)]
pub struct Section {
    /// Reveal-scheduler id.
    pub id: SectionId,
    /// Anchor name for in-page navigation.
    pub anchor: &'static str,
    /// Heading shown at the section's top row.
    pub title: &'static str,
    /// Bounds in page coordinates.
    pub bounds: Rect,
}

/// Titles and heights of the page's sections, top to bottom.
const SECTION_SPECS: &[(&str, &str, u16)] = &[
    ("hero", "Every Product. Verified.", 12),
    ("how-it-works", "How It Works", 10),
    ("features", "Why VeriScan", 10),
    ("demo", "Try The Demo", 8),
    ("contact", "Get In Touch", 8),
];

/// The scrollable page under the pinned header.
#[derive(Debug)]
pub struct Page {
    sections: Vec<Section>,
    width: u16,
    viewport_height: u16,
    scroll_y: u16,
}

impl Page {
    /// Build the page for a viewport of the given size.
    #[must_use]
    pub fn new(width: u16, viewport_height: u16) -> Self {
        let mut sections = Vec::with_capacity(SECTION_SPECS.len());
        let mut y = HEADER_HEIGHT;
        for (index, &(anchor, title, height)) in SECTION_SPECS.iter().enumerate() {
            sections.push(Section {
                id: SectionId::new(index as u64),
                anchor,
                title,
                bounds: Rect::new(0, y, width, height),
            });
            y = y.saturating_add(height);
        }
        Self {
            sections,
            width,
            viewport_height,
            scroll_y: 0,
        }
    }

    /// The page's sections, top to bottom.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// `(id, bounds)` pairs for reveal registration.
    #[must_use]
    pub fn reveal_targets(&self) -> Vec<(SectionId, Rect)> {
        self.sections.iter().map(|s| (s.id, s.bounds)).collect()
    }

    /// Total page height in rows.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.sections.last().map_or(0, |s| s.bounds.bottom())
    }

    /// The current viewport in page coordinates.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        Rect::new(0, self.scroll_y, self.width, self.viewport_height)
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> u16 {
        self.scroll_y
    }

    fn max_scroll(&self) -> u16 {
        self.height().saturating_sub(self.viewport_height)
    }

    /// Scroll by a signed number of rows, clamped to the page.
    pub fn scroll_by(&mut self, delta: i32) {
        let current = i32::from(self.scroll_y);
        let next = (current + delta).clamp(0, i32::from(self.max_scroll()));
        self.scroll_y = next as u16;
    }

    /// Scroll so that an anchored section sits just below the header.
    ///
    /// Unknown anchors are logged at `warn` and the scroll is abandoned.
    pub fn scroll_to_anchor(&mut self, target: &str) -> Result<(), MissingTargetError> {
        let Some(section) = self.sections.iter().find(|s| s.anchor == target) else {
            let err = MissingTargetError {
                target: target.to_string(),
            };
            warn!(error = %err, "anchor scroll abandoned");
            return Err(err);
        };
        self.scroll_y = section
            .bounds
            .y
            .saturating_sub(HEADER_HEIGHT)
            .min(self.max_scroll());
        debug!(anchor = target, scroll_y = self.scroll_y, "anchor scroll");
        Ok(())
    }

    /// Whether the header should render in its elevated (scrolled) state.
    #[must_use]
    pub fn header_elevated(&self) -> bool {
        self.scroll_y > HEADER_ELEVATION_SCROLL
    }

    /// Resize the viewport, re-clamping the scroll offset.
    pub fn resize(&mut self, width: u16, viewport_height: u16) {
        self.width = width;
        self.viewport_height = viewport_height;
        for section in &mut self.sections {
            section.bounds.width = width;
        }
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }
}

// ---------------------------------------------------------------------------
// Nav menu
// ---------------------------------------------------------------------------

/// The collapsible navigation menu.
///
/// Pure open/close state plus the focus handoffs: the first link takes
/// focus when the menu opens, and the toggle takes it back on an Escape
/// dismissal (outside clicks leave focus where it was).
#[derive(Debug, Default)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    /// Create a closed menu.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Menu bounds in viewport coordinates while open.
    #[must_use]
    pub fn bounds(&self, width: u16) -> Rect {
        Rect::new(0, HEADER_HEIGHT, width.min(24), SECTION_SPECS.len() as u16)
    }

    /// Toggle the menu. Opening moves focus to the first link.
    pub fn toggle(&mut self, focus: &mut FocusRegistry) {
        self.open = !self.open;
        if self.open {
            focus.attach(nav_first_link_id());
            focus.focus(&nav_first_link_id());
        } else {
            focus.detach(&nav_first_link_id());
        }
        debug!(open = self.open, "nav menu toggled");
    }

    /// Close the menu after an Escape press; focus returns to the toggle.
    pub fn close_on_escape(&mut self, focus: &mut FocusRegistry) {
        if !self.open {
            return;
        }
        self.open = false;
        focus.detach(&nav_first_link_id());
        focus.focus(&nav_toggle_id());
    }

    /// Close the menu after a click outside it; focus is left alone.
    pub fn close_on_outside_click(&mut self, focus: &mut FocusRegistry) {
        if !self.open {
            return;
        }
        self.open = false;
        focus.detach(&nav_first_link_id());
    }
}
