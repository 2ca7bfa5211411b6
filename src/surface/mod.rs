//! Capability-conditioned command surface.
//!
//! The set of callable commands of a session depends on what was
//! negotiated: dialect, browser vendor, mobile platform, cloud vendor and
//! grid server each add or override protocol tables.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FeatureFlags`] | Session attributes selecting tables |
//! | [`CommandSurface`] | Command name → [`CommandBinding`] |
//! | [`CommandBinding`] | Method, endpoint and descriptor of one command |
//!
//! # Example
//!
//! ```
//! use webdriver_remote::surface::{Dialect, FeatureFlags, build_command_surface};
//!
//! let surface = build_command_surface(&FeatureFlags::new(Dialect::W3C).with_chrome());
//! assert!(surface.contains("navigateTo"));
//! assert!(surface.contains("getNetworkConditions"));
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Executable command bindings.
pub mod binding;

/// Table layering and merge.
pub mod builder;

/// Feature flags and environment detection.
pub mod flags;

// ============================================================================
// Re-exports
// ============================================================================

pub use binding::{CommandBinding, PreparedRequest};
pub use builder::{build_command_surface, build_from_tables, select_tables};
pub use flags::{Dialect, FeatureFlags};

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;

// ============================================================================
// CommandSurface
// ============================================================================

/// Named operations callable on a session.
///
/// Built once per session and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CommandSurface {
    commands: FxHashMap<&'static str, CommandBinding>,
    flags: FeatureFlags,
}

impl CommandSurface {
    /// Looks up a command by name.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandBinding> {
        self.commands.get(name)
    }

    /// Returns `true` if the command exists.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Number of commands.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if there are no commands.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Flags the surface was built for.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    /// Iterates commands in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CommandBinding)> {
        self.commands.iter().map(|(name, binding)| (*name, binding))
    }

    /// Returns all command names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
