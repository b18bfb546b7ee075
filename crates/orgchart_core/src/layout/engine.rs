//! Band-per-root tree layout.
//!
//! Breadth is measured in slots. A tree with `n` leaves needs `n` slots and
//! gets a band of `max(n, MIN_BAND_SLOTS)` slots; bands are laid out one
//! after another so sibling trees never overlap. Leaves take consecutive
//! slot centers in sibling order and each internal node sits midway between
//! its first and last child.

use super::{ChartEdge, ChartLayout, LayoutConfig, LayoutResult, NodePosition, Orientation, Point};
use crate::hierarchy::{Forest, NodeIndex};
use log::debug;

const MIN_BAND_SLOTS: usize = 2;

/// Lays out every tree of `forest`.
///
/// # Errors
/// - `LayoutError::InvalidSpacing` when the config spacing is unusable.
pub fn layout_forest(forest: &Forest, config: &LayoutConfig) -> LayoutResult<ChartLayout> {
    config.validate()?;

    let mut layout = ChartLayout::empty(config.orientation);
    if forest.is_empty() {
        return Ok(layout);
    }

    let nodes = forest.nodes();
    let leaf_counts = leaf_counts(forest);
    let mut slots = vec![0.0_f64; nodes.len()];
    let mut band_start = 0.0_f64;

    for &root in forest.roots() {
        let band = leaf_counts[root].max(MIN_BAND_SLOTS) as f64;
        let mut next_leaf = band_start + (band - leaf_counts[root] as f64) / 2.0;

        let order = subtree_preorder(forest, root);
        for &index in &order {
            if nodes[index].children.is_empty() {
                slots[index] = next_leaf + 0.5;
                next_leaf += 1.0;
            }
        }
        for &index in order.iter().rev() {
            let children = &nodes[index].children;
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                slots[index] = (slots[*first] + slots[*last]) / 2.0;
            }
        }

        band_start += band;
    }

    for index in forest.depth_first() {
        let node = &nodes[index];
        let depth = node.depth as f64;
        let breadth = slots[index];
        let position = match config.orientation {
            Orientation::Vertical => Point {
                x: breadth * config.spacing_x,
                y: depth * config.spacing_y,
            },
            Orientation::Horizontal => Point {
                x: depth * config.spacing_x,
                y: breadth * config.spacing_y,
            },
        };
        layout.nodes.push(NodePosition {
            id: node.contact.id,
            position,
            depth: node.depth,
        });
        for &child in &node.children {
            layout
                .edges
                .push(ChartEdge::new(node.contact.id, nodes[child].contact.id));
        }
    }

    debug!(
        "event=chart_layout module=layout status=ok orientation={} nodes={} edges={} bands={}",
        config.orientation,
        layout.nodes.len(),
        layout.edges.len(),
        forest.roots().len()
    );
    Ok(layout)
}

fn leaf_counts(forest: &Forest) -> Vec<usize> {
    let nodes = forest.nodes();
    let mut counts = vec![1_usize; nodes.len()];
    for index in forest.depth_first().into_iter().rev() {
        let children = &nodes[index].children;
        if !children.is_empty() {
            counts[index] = children.iter().map(|child| counts[*child]).sum();
        }
    }
    counts
}

fn subtree_preorder(forest: &Forest, root: NodeIndex) -> Vec<NodeIndex> {
    let nodes = forest.nodes();
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(index) = stack.pop() {
        order.push(index);
        stack.extend(nodes[index].children.iter().rev().copied());
    }
    order
}
