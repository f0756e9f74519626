#![forbid(unsafe_code)]

//! The modal overlay slot.
//!
//! The page presents at most one modal surface at a time. [`OverlayHost`]
//! owns that single slot: attaching yields a generation-tagged
//! [`SurfaceId`], and detaching with a stale id is a harmless no-op, so a
//! teardown that races a newer attach can never remove the wrong surface.
//!
//! Attachment failure is the presentation error of the error taxonomy:
//! callers abort whatever they were opening and leave no partial state.

/// Identity of one attached surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

/// Accessibility role of an overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    /// A modal dialog.
    Dialog,
}

/// Description of a surface attached to the overlay slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySurface {
    /// Accessibility role announced for the surface.
    pub role: SurfaceRole,
    /// Whether the surface is modal (blocks the content behind it).
    pub modal: bool,
    /// Id of the node that labels the surface (its heading).
    pub labelled_by: String,
}

impl OverlaySurface {
    /// Describe a modal dialog labelled by the given heading id.
    #[must_use]
    pub fn dialog(labelled_by: impl Into<String>) -> Self {
        Self {
            role: SurfaceRole::Dialog,
            modal: true,
            labelled_by: labelled_by.into(),
        }
    }
}

/// The overlay slot could not be taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationError {
    /// Another surface already holds the slot.
    SlotOccupied {
        /// The surface currently holding the slot.
        held_by: SurfaceId,
    },
}

impl std::fmt::Display for PresentationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SlotOccupied { held_by } => {
                write!(f, "overlay slot already held by surface {}", held_by.0)
            }
        }
    }
}

impl std::error::Error for PresentationError {}

/// Owner of the single modal overlay slot.
#[derive(Debug, Default)]
pub struct OverlayHost {
    slot: Option<(SurfaceId, OverlaySurface)>,
    next: u64,
}

impl OverlayHost {
    /// Create a host with an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface to the slot.
    ///
    /// Fails with [`PresentationError::SlotOccupied`] if a surface is
    /// already attached; the slot is left untouched in that case.
    pub fn attach(&mut self, surface: OverlaySurface) -> Result<SurfaceId, PresentationError> {
        if let Some((held_by, _)) = self.slot {
            return Err(PresentationError::SlotOccupied { held_by });
        }
        let id = SurfaceId(self.next);
        self.next += 1;
        self.slot = Some((id, surface));
        Ok(id)
    }

    /// Detach the surface with the given id.
    ///
    /// Returns `true` if that exact surface was attached. Stale ids (from a
    /// surface already detached or replaced) are no-ops.
    pub fn detach(&mut self, id: SurfaceId) -> bool {
        match self.slot {
            Some((held, _)) if held == id => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }

    /// The currently attached surface, if any.
    #[must_use]
    pub fn active(&self) -> Option<(SurfaceId, &OverlaySurface)> {
        self.slot.as_ref().map(|(id, s)| (*id, s))
    }

    /// Number of attached surfaces (0 or 1).
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.slot.is_some())
    }

    /// Whether the slot is free.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
