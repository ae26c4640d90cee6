//! Dendrogram hierarchy and the cluster (dendrogram) layout.
//!
//! Leaves are placed at equal spacing along the breadth axis in visit
//! order; every internal node sits at the mean of its children. Depth is the
//! height above the deepest leaf, so all leaves share depth 0 and the root
//! ends up at the far end of the depth axis.

use serde::{Deserialize, Serialize};

/// One node of `dendro_data.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DendroNode {
    /// Node id, referenced by element ids.
    pub id: u32,
    /// Merge distance; 0 for leaves.
    #[serde(default)]
    pub dist: f64,
    /// Merged subclusters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DendroNode>,
}

impl DendroNode {
    /// A leaf.
    pub const fn leaf(id: u32) -> Self {
        Self { id, dist: 0.0, children: Vec::new() }
    }

    /// An internal node.
    pub const fn merge(id: u32, dist: f64, children: Vec<Self>) -> Self {
        Self { id, dist, children }
    }
}

/// A node after layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Source id.
    pub id: u32,
    /// Source merge distance.
    pub dist: f64,
    /// Breadth position.
    pub x: f64,
    /// Depth position.
    pub y: f64,
    /// Arena index of the parent.
    pub parent: Option<usize>,
    /// Arena indices of the children.
    pub children: Vec<usize>,
}

impl TreeNode {
    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A laid-out hierarchy; index 0 is the root, nodes are in pre-order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    /// Cluster layout with unit separation into `breadth` x `depth`.
    pub fn cluster(root: &DendroNode, breadth: f64, depth: f64) -> Self {
        let mut nodes = Vec::new();
        flatten(root, None, &mut nodes);

        // post-order pass: leaves get consecutive slots, parents average
        let mut next_leaf = 0.0_f64;
        let mut height = vec![0.0_f64; nodes.len()];
        let mut raw_x = vec![0.0_f64; nodes.len()];
        for i in post_order(&nodes) {
            let children = &nodes[i].children;
            if children.is_empty() {
                raw_x[i] = next_leaf;
                next_leaf += 1.0;
            } else {
                raw_x[i] = children.iter().map(|&c| raw_x[c]).sum::<f64>() / children.len() as f64;
                height[i] = 1.0 + children.iter().map(|&c| height[c]).fold(0.0, f64::max);
            }
        }

        let x0 = -0.5;
        let x1 = (next_leaf - 1.0) + 0.5;
        let root_height = height.first().copied().unwrap_or(0.0);
        for (i, node) in nodes.iter_mut().enumerate() {
            node.x = (raw_x[i] - x0) / (x1 - x0) * breadth;
            let ratio = if root_height > 0.0 { height[i] / root_height } else { 1.0 };
            node.y = (1.0 - ratio) * depth;
        }
        Self { nodes }
    }

    /// Replace depth with merge distance: the root at 0, leaves at `depth`.
    pub fn scale_depth_by_distance(&mut self, depth: f64) {
        let max = self.root().map_or(0.0, |r| r.dist);
        for node in &mut self.nodes {
            node.y = if max > 0.0 { (max - node.dist) * depth / max } else { 0.0 };
        }
    }

    /// Root node.
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    /// Every node, root first.
    pub fn descendants(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Leaves, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Parent-child pairs.
    pub fn links(&self) -> impl Iterator<Item = (&TreeNode, &TreeNode)> {
        self.nodes
            .iter()
            .filter_map(move |n| n.parent.and_then(|p| self.nodes.get(p)).map(|parent| (parent, n)))
    }

    /// Node by source id.
    pub fn node(&self, id: u32) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn flatten(node: &DendroNode, parent: Option<usize>, out: &mut Vec<TreeNode>) -> usize {
    let index = out.len();
    out.push(TreeNode { id: node.id, dist: node.dist, x: 0.0, y: 0.0, parent, children: Vec::new() });
    for child in &node.children {
        let c = flatten(child, Some(index), out);
        out[index].children.push(c);
    }
    index
}

fn post_order(nodes: &[TreeNode]) -> Vec<usize> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<(usize, bool)> = if nodes.is_empty() { Vec::new() } else { vec![(0, false)] };
    while let Some((i, expanded)) = stack.pop() {
        if expanded {
            order.push(i);
            continue;
        }
        stack.push((i, true));
        for &c in nodes[i].children.iter().rev() {
            stack.push((c, false));
        }
    }
    order
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn sample() -> DendroNode {
        // ((0 1) 2)
        DendroNode::merge(
            4,
            2.0,
            vec![DendroNode::merge(3, 1.0, vec![DendroNode::leaf(0), DendroNode::leaf(1)]), DendroNode::leaf(2)],
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn leaves_are_evenly_spaced_and_parents_centred() {
        let tree = Tree::cluster(&sample(), 300.0, 100.0);
        let xs: Vec<f64> = tree.leaves().map(|n| n.x).collect();
        assert!(close(xs[0], 50.0) && close(xs[1], 150.0) && close(xs[2], 250.0));
        assert!(close(tree.node(3).unwrap().x, 100.0));
        assert!(close(tree.node(4).unwrap().x, 175.0));
    }

    #[test]
    fn depth_counts_levels_above_leaves() {
        let tree = Tree::cluster(&sample(), 300.0, 100.0);
        assert!(close(tree.node(4).unwrap().y, 0.0));
        assert!(close(tree.node(3).unwrap().y, 50.0));
        assert!(tree.leaves().all(|n| close(n.y, 100.0)));
    }

    #[test]
    fn distance_scaling() {
        let mut tree = Tree::cluster(&sample(), 300.0, 100.0);
        tree.scale_depth_by_distance(150.0);
        assert!(close(tree.node(4).unwrap().y, 0.0));
        assert!(close(tree.node(3).unwrap().y, 75.0));
        assert!(close(tree.node(0).unwrap().y, 150.0));
    }

    #[test]
    fn single_leaf() {
        let tree = Tree::cluster(&DendroNode::leaf(9), 40.0, 10.0);
        let root = tree.root().unwrap();
        assert!(close(root.x, 20.0));
        assert!(close(root.y, 0.0));
        assert_eq!(tree.links().count(), 0);
    }

    #[test]
    fn links_pair_parent_with_child() {
        let tree = Tree::cluster(&sample(), 1.0, 1.0);
        let pairs: Vec<(u32, u32)> = tree.links().map(|(p, c)| (p.id, c.id)).collect();
        assert_eq!(pairs, vec![(4, 3), (3, 0), (3, 1), (4, 2)]);
    }

    #[test]
    fn parses_nested_json() {
        let node: DendroNode =
            serde_json::from_str(r#"{"id": 2, "dist": 0.5, "children": [{"id": 0}, {"id": 1, "dist": 0}]}"#).unwrap();
        assert_eq!(node.children.len(), 2);
        assert!(node.children[0].children.is_empty());
    }
}
