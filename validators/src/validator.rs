use serde::{Deserialize, Serialize};

use cinnabar_common::{NodeId, Weight};

/// A validator is a node identifier and a stake weight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub node_id: NodeId,
    pub weight: Weight,
}

impl Validator {
    pub const fn new(node_id: NodeId, weight: Weight) -> Self {
        Self { node_id, weight }
    }
}

impl PartialOrd for Validator {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Validator {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.node_id.cmp(&other.node_id)
    }
}
