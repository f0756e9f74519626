#![forbid(unsafe_code)]

//! Named style tokens.
//!
//! Components reference colors by name ("primary", "success") and the page
//! installs the actual values, so visual identity stays out of component
//! logic. Token groups installed with [`Theme::install_once`] are keyed by
//! a stable identifier and never installed twice; the dialog relies on
//! this for its one-time style injection across open/close cycles.

use std::collections::{HashMap, HashSet};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a color from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Registry of named color tokens.
#[derive(Debug, Default)]
pub struct Theme {
    tokens: HashMap<String, Color>,
    groups: HashSet<String>,
}

impl Theme {
    /// Create an empty theme.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A theme preloaded with the page's base tokens.
    ///
    /// - `primary`: brand accent (scanner frame, action buttons)
    /// - `success`: authentication-confirmed green
    /// - `muted`: secondary text
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut theme = Self::new();
        theme.define("primary", Color::rgb(59, 130, 246));
        theme.define("success", Color::rgb(34, 197, 94));
        theme.define("muted", Color::rgb(128, 128, 128));
        theme
    }

    /// Define a named token. An existing token with this name is replaced.
    pub fn define(&mut self, name: impl Into<String>, color: Color) {
        self.tokens.insert(name.into(), color);
    }

    /// Install a token group exactly once.
    ///
    /// The group is identified by `group`; if a group with that identifier
    /// was already installed, nothing changes and `false` is returned.
    pub fn install_once(&mut self, group: &str, tokens: &[(&str, Color)]) -> bool {
        if !self.groups.insert(group.to_string()) {
            return false;
        }
        for (name, color) in tokens {
            self.define(*name, *color);
        }
        true
    }

    /// Whether a token group has been installed.
    #[must_use]
    pub fn installed(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Number of installed token groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Resolve a token by name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Color> {
        self.tokens.get(name).copied()
    }
}
