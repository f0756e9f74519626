#![forbid(unsafe_code)]

//! Keyboard focus registry.
//!
//! Tracks which focusable nodes are attached to the page and which one
//! currently holds focus. Focus can only rest on an attached node; when the
//! focused node is detached, focus is cleared rather than left dangling.
//! This gives the dialog its record/restore contract: remember the node
//! focused before opening, and restore it on close only if it is still
//! attached.

/// Identifier for a focusable node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusId(String);

impl FocusId {
    /// Create a focus id.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FocusId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Registry of attached focusable nodes and the current focus holder.
#[derive(Debug, Default)]
pub struct FocusRegistry {
    attached: Vec<FocusId>,
    current: Option<FocusId>,
}

impl FocusRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a focusable node. Attaching an already attached id is a no-op.
    pub fn attach(&mut self, id: FocusId) {
        if !self.attached.contains(&id) {
            self.attached.push(id);
        }
    }

    /// Detach a node. Clears focus if the node held it.
    ///
    /// Returns `true` if the node was attached.
    pub fn detach(&mut self, id: &FocusId) -> bool {
        let len_before = self.attached.len();
        self.attached.retain(|a| a != id);
        let removed = self.attached.len() < len_before;
        if removed && self.current.as_ref() == Some(id) {
            self.current = None;
        }
        removed
    }

    /// Whether a node is attached.
    #[must_use]
    pub fn is_attached(&self, id: &FocusId) -> bool {
        self.attached.contains(id)
    }

    /// Move focus to a node. Fails (returns `false`) if it is not attached.
    pub fn focus(&mut self, id: &FocusId) -> bool {
        if self.is_attached(id) {
            self.current = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Clear focus without detaching anything.
    pub fn blur(&mut self) {
        self.current = None;
    }

    /// The node currently holding focus, if any.
    #[must_use]
    pub fn current(&self) -> Option<&FocusId> {
        self.current.as_ref()
    }

    /// Number of attached nodes.
    #[must_use]
    pub fn attached_len(&self) -> usize {
        self.attached.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> FocusId {
        FocusId::new(name)
    }

    #[test]
    fn focus_requires_attachment() {
        let mut reg = FocusRegistry::new();
        assert!(!reg.focus(&id("ghost")));
        assert_eq!(reg.current(), None);

        reg.attach(id("button"));
        assert!(reg.focus(&id("button")));
        assert_eq!(reg.current(), Some(&id("button")));
    }

    #[test]
    fn attach_is_idempotent() {
        let mut reg = FocusRegistry::new();
        reg.attach(id("a"));
        reg.attach(id("a"));
        assert_eq!(reg.attached_len(), 1);
    }

    #[test]
    fn detach_clears_focus_of_holder() {
        let mut reg = FocusRegistry::new();
        reg.attach(id("a"));
        reg.focus(&id("a"));
        assert!(reg.detach(&id("a")));
        assert_eq!(reg.current(), None);
        assert!(!reg.is_attached(&id("a")));
    }

    #[test]
    fn detach_leaves_other_focus_alone() {
        let mut reg = FocusRegistry::new();
        reg.attach(id("a"));
        reg.attach(id("b"));
        reg.focus(&id("a"));
        reg.detach(&id("b"));
        assert_eq!(reg.current(), Some(&id("a")));
    }

    #[test]
    fn detach_unknown_returns_false() {
        let mut reg = FocusRegistry::new();
        assert!(!reg.detach(&id("nope")));
    }

    #[test]
    fn blur_keeps_attachment() {
        let mut reg = FocusRegistry::new();
        reg.attach(id("a"));
        reg.focus(&id("a"));
        reg.blur();
        assert_eq!(reg.current(), None);
        assert!(reg.is_attached(&id("a")));
    }
}
