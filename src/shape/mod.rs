//! Structural predicates used as win conditions
//!
//! Two height measures are in play:
//! - `depth`: edges on the longest root-to-leaf path (empty = 0, leaf = 0)
//! - `levels`: nodes on that path (empty = 0, leaf = 1)
//!
//! Balance compares `levels` of the two subtrees, so an absent child and a
//! leaf child are told apart.

use std::collections::VecDeque;

use crate::tree::TreeNode;

/// Number of nodes.
pub fn node_count<T>(root: Option<&TreeNode<T>>) -> usize {
    root.map_or(0, |node| {
        1 + node_count(node.left.as_deref()) + node_count(node.right.as_deref())
    })
}

/// Number of leaves.
pub fn leaf_count<T>(root: Option<&TreeNode<T>>) -> usize {
    match root {
        None => 0,
        Some(node) if node.is_leaf() => 1,
        Some(node) => leaf_count(node.left.as_deref()) + leaf_count(node.right.as_deref()),
    }
}

/// Number of levels.
pub fn levels<T>(root: Option<&TreeNode<T>>) -> usize {
    root.map_or(0, |node| {
        1 + levels(node.left.as_deref()).max(levels(node.right.as_deref()))
    })
}

/// Longest root-to-leaf edge count; 0 for an empty tree.
pub fn depth<T>(root: Option<&TreeNode<T>>) -> usize {
    levels(root).saturating_sub(1)
}

/// Level-order scan: once a gap is seen, no node may follow it.
///
/// Missing children enter the queue as `None` markers.
pub fn is_complete<T>(root: Option<&TreeNode<T>>) -> bool {
    let mut queue = VecDeque::from([root]);
    let mut seen_gap = false;

    while let Some(entry) = queue.pop_front() {
        match entry {
            None => seen_gap = true,
            Some(_) if seen_gap => return false,
            Some(node) => {
                queue.push_back(node.left.as_deref());
                queue.push_back(node.right.as_deref());
            }
        }
    }
    true
}

/// No node has a right child.
pub fn is_left_skewed<T>(root: Option<&TreeNode<T>>) -> bool {
    let mut current = root;
    while let Some(node) = current {
        if node.right.is_some() {
            return false;
        }
        current = node.left.as_deref();
    }
    true
}

/// Every node's subtree heights differ by at most one.
pub fn is_balanced<T>(root: Option<&TreeNode<T>>) -> bool {
    balanced_levels(root).is_some()
}

// Levels of a balanced subtree, `None` as soon as any subtree is unbalanced.
fn balanced_levels<T>(root: Option<&TreeNode<T>>) -> Option<usize> {
    let Some(node) = root else {
        return Some(0);
    };
    let left = balanced_levels(node.left.as_deref())?;
    let right = balanced_levels(node.right.as_deref())?;
    (left.abs_diff(right) <= 1).then(|| 1 + left.max(right))
}

/// Every node has zero or two children.
pub fn is_full<T>(root: Option<&TreeNode<T>>) -> bool {
    match root {
        None => true,
        Some(node) => match (node.left.as_deref(), node.right.as_deref()) {
            (None, None) => true,
            (Some(left), Some(right)) => is_full(Some(left)) && is_full(Some(right)),
            _ => false,
        },
    }
}

/// Full, with every leaf on the last level.
pub fn is_perfect<T>(root: Option<&TreeNode<T>>) -> bool {
    let count = node_count(root);
    // A perfect tree with L levels has exactly 2^L - 1 nodes.
    let levels = levels(root) as u32;
    levels < usize::BITS && count == (1usize << levels) - 1
}
