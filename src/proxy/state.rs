//! Proxy Lifecycle State
//!
//! The three-state machine the hosting runtime drives:
//! Uninstalled → Installed (install event) → Active (activate event).

use serde::Serialize;

// == Lifecycle State ==
/// Where a proxy instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Fresh instance; the shell cache is not yet seeded
    Uninstalled,
    /// Shell seeded; ready to take over immediately, not yet in control
    Installed,
    /// In control of request interception
    Active,
}

impl LifecycleState {
    /// True once the instance intercepts requests.
    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::Active)
    }
}
