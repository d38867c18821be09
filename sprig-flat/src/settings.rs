use serde::{Deserialize, Serialize};

use crate::Result;

/// Configuration knobs for flattening and visible-list publishing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenSettings {
    /// Deepest level the flattener accepts (`None` means unlimited).
    ///
    /// Nested data containing a cycle never terminates without a limit.
    pub max_depth: Option<usize>,
    /// Capacity of each visible-list subscriber channel (`None` means
    /// unbounded).
    pub visible_capacity: Option<usize>,
}

impl FlattenSettings {
    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_visible_capacity(mut self, capacity: usize) -> Self {
        self.visible_capacity = Some(capacity);
        self
    }
}
