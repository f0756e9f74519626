#![forbid(unsafe_code)]

//! Host capability detection.
//!
//! The reveal scheduler needs the host to report viewport intersections.
//! Not every front end can (a dumb pipe, a scripted replay without layout
//! information), so detection is explicit and components receive the result
//! rather than probing ambient state themselves.
//!
//! Detection can be forced off with the `VERISCAN_NO_OBSERVER` environment
//! variable (any value except `0`), which is how the degraded path is
//! exercised end to end.

/// What the host environment can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Whether the host can report viewport-intersection changes.
    pub viewport_observation: bool,
}

/// Environment variable that force-disables viewport observation.
pub const NO_OBSERVER_ENV: &str = "VERISCAN_NO_OBSERVER";

impl HostCapabilities {
    /// Capabilities of a fully featured host.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            viewport_observation: true,
        }
    }

    /// Capabilities with viewport observation unavailable.
    #[must_use]
    pub const fn without_viewport_observation() -> Self {
        Self {
            viewport_observation: false,
        }
    }

    /// Detect capabilities, honoring the environment override.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env_value(std::env::var(NO_OBSERVER_ENV).ok().as_deref())
    }

    /// Resolve capabilities from the override variable's value.
    ///
    /// `None` (unset) and `"0"` leave observation enabled; anything else
    /// disables it.
    #[must_use]
    pub fn from_env_value(no_observer: Option<&str>) -> Self {
        match no_observer {
            None | Some("0") | Some("") => Self::full(),
            Some(_) => Self::without_viewport_observation(),
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::full()
    }
}
