//! Binary search tree engine
//!
//! Ordering invariant: for every node n,
//!   values in n.left  <  n.value  <  values in n.right
//!
//! Insertion never mutates: the comparison path is copied and every other
//! subtree is shared with the input tree.
//!
//! Duplicates are handled per call site through [`DuplicatePolicy`]:
//! - building and inserting route equal values right
//! - slot lookups for interactive feedback pick the policy explicitly

use std::cmp::Ordering;
use std::sync::Arc;

use crate::tree::{NodeId, NodeIdGen, Side, TreeNode};

/// What to do with a value equal to one already in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Treat equal as greater: descend right.
    RouteRight,
    /// Equal values have no valid slot.
    Reject,
}

/// Attachment point for a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertionSlot {
    /// Node that receives the new child.
    pub parent_id: NodeId,
    /// Which of its (empty) children to fill.
    pub side: Side,
}

impl InsertionSlot {
    /// Construct a slot.
    pub fn new(parent_id: impl Into<NodeId>, side: Side) -> Self {
        Self {
            parent_id: parent_id.into(),
            side,
        }
    }
}

/// Decide the descent direction for `value` at `node_value`.
#[inline]
fn descend<T: Ord>(value: &T, node_value: &T, policy: DuplicatePolicy) -> Option<Side> {
    match value.cmp(node_value) {
        Ordering::Less => Some(Side::Left),
        Ordering::Greater => Some(Side::Right),
        Ordering::Equal => match policy {
            DuplicatePolicy::RouteRight => Some(Side::Right),
            DuplicatePolicy::Reject => None,
        },
    }
}

/// Build a BST by inserting `values` in order, equal values routed right.
///
/// Ids come from a fresh `node-N` sequence in insertion order.
pub fn build<T, I>(values: I) -> Option<TreeNode<T>>
where
    T: Ord + Clone,
    I: IntoIterator<Item = T>,
{
    build_with_ids(values, &mut NodeIdGen::default())
}

/// [`build`] drawing ids from the supplied generator.
pub fn build_with_ids<T, I>(values: I, ids: &mut NodeIdGen) -> Option<TreeNode<T>>
where
    T: Ord + Clone,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .fold(None, |root, value| Some(insert(root.as_ref(), ids.next_id(), value)))
}

/// Insert `value` as a new leaf and return the new root (equal values go right).
pub fn insert<T: Ord + Clone>(
    root: Option<&TreeNode<T>>,
    id: impl Into<NodeId>,
    value: T,
) -> TreeNode<T> {
    let leaf = TreeNode::leaf(id, value);
    match root {
        None => leaf,
        Some(root) => insert_below(root, leaf),
    }
}

fn insert_below<T: Ord + Clone>(node: &TreeNode<T>, leaf: TreeNode<T>) -> TreeNode<T> {
    let side =
        descend(&leaf.value, &node.value, DuplicatePolicy::RouteRight).unwrap_or(Side::Right);
    let new_child = match node.child(side) {
        Some(child) => insert_below(child, leaf),
        None => leaf,
    };

    let mut copy = node.clone();
    match side {
        Side::Left => copy.left = Some(Arc::new(new_child)),
        Side::Right => copy.right = Some(Arc::new(new_child)),
    }
    copy
}

/// Walk the insertion path for `value` without modifying anything.
///
/// Returns `None` for an empty tree, or when `policy` is
/// [`DuplicatePolicy::Reject`] and the value is already present.
pub fn find_insertion_slot<T: Ord>(
    root: Option<&TreeNode<T>>,
    value: &T,
    policy: DuplicatePolicy,
) -> Option<InsertionSlot> {
    let mut current = root?;
    loop {
        let side = descend(value, &current.value, policy)?;
        match current.child(side) {
            Some(child) => current = child,
            None => return Some(InsertionSlot::new(current.id.clone(), side)),
        }
    }
}

/// Check the strict ordering invariant with inherited open bounds.
///
/// An empty tree is a valid BST.
pub fn is_valid_bst<T: Ord>(root: Option<&TreeNode<T>>) -> bool {
    within(root, None, None)
}

fn within<T: Ord>(node: Option<&TreeNode<T>>, lower: Option<&T>, upper: Option<&T>) -> bool {
    let Some(node) = node else {
        return true;
    };
    if lower.is_some_and(|low| node.value <= *low)
        || upper.is_some_and(|high| node.value >= *high)
    {
        return false;
    }
    within(node.left.as_deref(), lower, Some(&node.value))
        && within(node.right.as_deref(), Some(&node.value), upper)
}

/// Height-balanced BST from `values` by midpoint recursion.
///
/// Values are sorted and de-duplicated first. Ids are assigned in preorder.
pub fn build_balanced<T: Ord + Clone>(values: &[T], ids: &mut NodeIdGen) -> Option<TreeNode<T>> {
    let mut sorted = values.to_vec();
    sorted.sort();
    sorted.dedup();
    balanced_from_sorted(&sorted, ids)
}

fn balanced_from_sorted<T: Clone>(sorted: &[T], ids: &mut NodeIdGen) -> Option<TreeNode<T>> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    let mut node = TreeNode::leaf(ids.next_id(), sorted[mid].clone());
    node.left = balanced_from_sorted(&sorted[..mid], ids).map(Arc::new);
    node.right = balanced_from_sorted(&sorted[mid + 1..], ids).map(Arc::new);
    Some(node)
}

/// Search following the ordering invariant.
pub fn contains<T: Ord>(root: Option<&TreeNode<T>>, value: &T) -> bool {
    let mut current = root;
    while let Some(node) = current {
        current = match value.cmp(&node.value) {
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
            Ordering::Equal => return true,
        };
    }
    false
}

/// Leftmost value.
pub fn min<T>(root: Option<&TreeNode<T>>) -> Option<&T> {
    let mut node = root?;
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    Some(&node.value)
}

/// Rightmost value.
pub fn max<T>(root: Option<&TreeNode<T>>) -> Option<&T> {
    let mut node = root?;
    while let Some(right) = node.right.as_deref() {
        node = right;
    }
    Some(&node.value)
}
