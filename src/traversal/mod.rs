//! Traversal engine
//!
//! Every traversal is computed eagerly and returned as a complete sequence.
//! Pacing the reveal of that sequence belongs to the caller.
//!
//! Frontier discipline:
//! - Bfs: FIFO seeded with the root, children enqueued left then right
//! - Dfs: LIFO seeded with the root, right pushed before left so left pops first
//! - Inorder / Preorder / Postorder: recursive, no explicit frontier

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::tree::{NodeId, TreeNode};

/// Traversal order over a binary tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TraversalKind {
    /// Left, node, right.
    Inorder,
    /// Node, left, right.
    Preorder,
    /// Left, right, node.
    Postorder,
    /// Level order with a queue.
    Bfs,
    /// Depth-first with an explicit stack.
    Dfs,
}

impl TraversalKind {
    /// All kinds, in menu order.
    pub const ALL: [TraversalKind; 5] = [
        TraversalKind::Inorder,
        TraversalKind::Preorder,
        TraversalKind::Postorder,
        TraversalKind::Bfs,
        TraversalKind::Dfs,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            TraversalKind::Inorder => "Inorder",
            TraversalKind::Preorder => "Preorder",
            TraversalKind::Postorder => "Postorder",
            TraversalKind::Bfs => "BFS",
            TraversalKind::Dfs => "DFS",
        }
    }

    /// One-line reminder of the visiting rule.
    pub fn hint(self) -> &'static str {
        match self {
            TraversalKind::Inorder => "Left → Root → Right",
            TraversalKind::Preorder => "Root → Left → Right",
            TraversalKind::Postorder => "Left → Right → Root",
            TraversalKind::Bfs => "Level by level",
            TraversalKind::Dfs => "Deep first, then backtrack",
        }
    }

    /// True for the kinds driven by an explicit queue or stack.
    pub fn uses_frontier(self) -> bool {
        matches!(self, TraversalKind::Bfs | TraversalKind::Dfs)
    }
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised traversal name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown traversal kind '{0}' (expected inorder, preorder, postorder, bfs or dfs)")]
pub struct ParseTraversalKindError(String);

impl FromStr for TraversalKind {
    type Err = ParseTraversalKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inorder" | "in" => Ok(TraversalKind::Inorder),
            "preorder" | "pre" => Ok(TraversalKind::Preorder),
            "postorder" | "post" => Ok(TraversalKind::Postorder),
            "bfs" | "level" | "levelorder" => Ok(TraversalKind::Bfs),
            "dfs" => Ok(TraversalKind::Dfs),
            _ => Err(ParseTraversalKindError(s.to_string())),
        }
    }
}

/// Node sitting in a queue or stack.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontierEntry<T> {
    /// Node id.
    pub id: NodeId,
    /// Node value.
    pub value: T,
}

/// One visit, with the frontier around it.
///
/// Queues are listed front to back, stacks bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversalStep<T> {
    /// Visited node id (the one to highlight).
    pub node_id: NodeId,
    /// Visited node value.
    pub value: T,
    /// Frontier right after the visited node was removed.
    pub frontier_before: Vec<FrontierEntry<T>>,
    /// Frontier after the visited node's children were added.
    pub frontier_after: Vec<FrontierEntry<T>>,
}

/// Ordered values for `kind`. Empty tree gives an empty sequence.
pub fn traverse<T: Clone>(root: Option<&TreeNode<T>>, kind: TraversalKind) -> Vec<T> {
    visit_order(root, kind)
        .into_iter()
        .map(|node| node.value.clone())
        .collect()
}

/// Ordered node ids for `kind`.
pub fn traverse_ids<T>(root: Option<&TreeNode<T>>, kind: TraversalKind) -> Vec<NodeId> {
    visit_order(root, kind)
        .into_iter()
        .map(|node| node.id.clone())
        .collect()
}

/// Nodes in visiting order, borrowed from the tree.
pub fn visit_order<T>(root: Option<&TreeNode<T>>, kind: TraversalKind) -> Vec<&TreeNode<T>> {
    let mut out = Vec::new();
    let Some(root) = root else {
        return out;
    };
    match kind {
        TraversalKind::Inorder | TraversalKind::Preorder | TraversalKind::Postorder => {
            recurse(root, kind, &mut out)
        }
        TraversalKind::Bfs => {
            let mut queue = VecDeque::from([root]);
            while let Some(node) = queue.pop_front() {
                out.push(node);
                queue.extend(node.left.as_deref());
                queue.extend(node.right.as_deref());
            }
        }
        TraversalKind::Dfs => {
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                out.push(node);
                stack.extend(node.right.as_deref());
                stack.extend(node.left.as_deref());
            }
        }
    }
    out
}

fn recurse<'a, T>(node: &'a TreeNode<T>, kind: TraversalKind, out: &mut Vec<&'a TreeNode<T>>) {
    if kind == TraversalKind::Preorder {
        out.push(node);
    }
    if let Some(left) = node.left.as_deref() {
        recurse(left, kind, out);
    }
    if kind == TraversalKind::Inorder {
        out.push(node);
    }
    if let Some(right) = node.right.as_deref() {
        recurse(right, kind, out);
    }
    if kind == TraversalKind::Postorder {
        out.push(node);
    }
}

fn snapshot<'a, T: Clone + 'a>(
    nodes: impl Iterator<Item = &'a TreeNode<T>>,
) -> Vec<FrontierEntry<T>> {
    nodes
        .map(|node| FrontierEntry {
            id: node.id.clone(),
            value: node.value.clone(),
        })
        .collect()
}

/// Visit sequence with per-step frontier snapshots for animation.
///
/// Recursive kinds report empty frontiers.
pub fn traverse_steps<T: Clone>(
    root: Option<&TreeNode<T>>,
    kind: TraversalKind,
) -> Vec<TraversalStep<T>> {
    let Some(root) = root else {
        return Vec::new();
    };

    let step = |node: &TreeNode<T>,
                before: Vec<FrontierEntry<T>>,
                after: Vec<FrontierEntry<T>>| TraversalStep {
        node_id: node.id.clone(),
        value: node.value.clone(),
        frontier_before: before,
        frontier_after: after,
    };

    match kind {
        TraversalKind::Bfs => {
            let mut steps = Vec::new();
            let mut queue = VecDeque::from([root]);
            while let Some(node) = queue.pop_front() {
                let before = snapshot(queue.iter().copied());
                queue.extend(node.left.as_deref());
                queue.extend(node.right.as_deref());
                steps.push(step(node, before, snapshot(queue.iter().copied())));
            }
            steps
        }
        TraversalKind::Dfs => {
            let mut steps = Vec::new();
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                let before = snapshot(stack.iter().copied());
                stack.extend(node.right.as_deref());
                stack.extend(node.left.as_deref());
                steps.push(step(node, before, snapshot(stack.iter().copied())));
            }
            steps
        }
        _ => visit_order(Some(root), kind)
            .into_iter()
            .map(|node| step(node, Vec::new(), Vec::new()))
            .collect(),
    }
}

/// Grade of a submitted order against the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderCheck {
    /// Length of the leading run that matches.
    pub correct_prefix: usize,
    /// Submission has as many entries as the expected order.
    pub complete: bool,
    /// Complete and fully matching.
    pub correct: bool,
}

impl OrderCheck {
    /// The submission has already diverged from the expected order.
    pub fn has_mistake(&self, submitted_len: usize) -> bool {
        self.correct_prefix < submitted_len
    }
}

/// Compare a (possibly partial) submission against `expected`.
pub fn check_order<T: PartialEq>(expected: &[T], submitted: &[T]) -> OrderCheck {
    let correct_prefix = expected
        .iter()
        .zip(submitted)
        .take_while(|(want, got)| want == got)
        .count();
    let complete = submitted.len() == expected.len();
    OrderCheck {
        correct_prefix,
        complete,
        correct: complete && correct_prefix == expected.len(),
    }
}
