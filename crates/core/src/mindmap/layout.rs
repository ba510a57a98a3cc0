use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mindmap::MindmapNode;

pub const DEFAULT_GAP_X: f64 = 220.0;
pub const DEFAULT_GAP_Y: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub gap_x: f64,
    pub gap_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap_x: DEFAULT_GAP_X,
            gap_y: DEFAULT_GAP_Y,
        }
    }
}

/// Computed position of one mind-map node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: Uuid,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub parent_id: Option<Uuid>,
    pub depth: usize,
}

struct Pending<'a> {
    node: &'a MindmapNode,
    x: f64,
    y: f64,
    parent_id: Option<Uuid>,
    depth: usize,
}

/// Lay out a single tree with its root at `(0, 0)`.
pub fn layout_tree(root: &MindmapNode, config: &LayoutConfig) -> Vec<LayoutNode> {
    layout_forest(std::slice::from_ref(root), config)
}

/// Lay out a forest. Roots sit on `y = 0`, centered on `x = 0` the same way
/// children are centered under their parent; a lone root lands on the origin.
///
/// Output is in pre-order, sibling order preserved left to right.
pub fn layout_forest(roots: &[MindmapNode], config: &LayoutConfig) -> Vec<LayoutNode> {
    let mut out = Vec::with_capacity(roots.iter().map(MindmapNode::count).sum());
    let mut stack: Vec<Pending<'_>> = Vec::new();

    push_children(&mut stack, roots, 0.0, 0.0, None, 0, config);

    while let Some(pending) = stack.pop() {
        let node = pending.node;
        out.push(LayoutNode {
            id: node.id,
            title: node.title.clone(),
            x: pending.x,
            y: pending.y,
            parent_id: pending.parent_id,
            depth: pending.depth,
        });

        push_children(
            &mut stack,
            &node.children,
            pending.x,
            pending.y + config.gap_y,
            Some(node.id),
            pending.depth + 1,
            config,
        );
    }

    out
}

// Children are pushed right to left so the leftmost pops first.
fn push_children<'a>(
    stack: &mut Vec<Pending<'a>>,
    children: &'a [MindmapNode],
    center_x: f64,
    y: f64,
    parent_id: Option<Uuid>,
    depth: usize,
    config: &LayoutConfig,
) {
    let k = children.len();
    if k == 0 {
        return;
    }
    let start_x = center_x - (k - 1) as f64 * config.gap_x / 2.0;

    for (i, child) in children.iter().enumerate().rev() {
        stack.push(Pending {
            node: child,
            x: start_x + i as f64 * config.gap_x,
            y,
            parent_id,
            depth,
        });
    }
}

/// `(parent, child)` id pairs, one per non-root node.
pub fn edges(nodes: &[LayoutNode]) -> Vec<(Uuid, Uuid)> {
    nodes
        .iter()
        .filter_map(|node| node.parent_id.map(|parent| (parent, node.id)))
        .collect()
}
