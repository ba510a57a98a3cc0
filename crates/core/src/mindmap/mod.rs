//! Mind-map trees, their 2-D layout, and the pan/zoom view over it.

pub mod layout;
pub mod view;

pub use layout::*;
pub use view::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One labeled node of a mind map.
///
/// The id is minted when the node is built and is never read back from
/// external data, so two structurally identical trees never share ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapNode {
    #[serde(skip_deserializing, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub children: Vec<MindmapNode>,
}

impl MindmapNode {
    pub fn new(title: impl Into<String>, children: Vec<MindmapNode>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            children,
        }
    }

    pub fn leaf(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Number of nodes in this subtree, including itself.
    pub fn count(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}
