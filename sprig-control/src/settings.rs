use serde::{Deserialize, Serialize};

/// Behaviour switches for [`crate::FlatTreeControl`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Forget expansion entries for nodes missing from the latest data
    /// nodes.
    pub prune_stale: bool,
}

impl ControlSettings {
    pub fn with_prune_stale(mut self, prune_stale: bool) -> Self {
        self.prune_stale = prune_stale;
        self
    }
}
