//! Tree node representation
//!
//! Node = (id, value, left?, right?)
//! Children are `Arc`-shared so that an edit only copies the path to the
//! edited node; siblings of that path are reused by both old and new roots.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::TreeError;

/// Stable identifier of a tree or graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// Left child (smaller values in a BST).
    Left,
    /// Right child (larger values in a BST).
    Right,
}

impl Side {
    /// Lowercase name, as the UI layer spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional shared child.
pub type Subtree<T> = Option<Arc<TreeNode<T>>>;

/// Binary tree node.
///
/// Cloning a node is shallow: children are reference-counted, so a clone
/// costs one id copy, one value copy and two pointer bumps.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode<T> {
    /// Identifier, unique within one tree.
    pub id: NodeId,

    /// Payload compared by BST operations.
    pub value: T,

    /// Left child.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub left: Subtree<T>,

    /// Right child.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub right: Subtree<T>,
}

impl<T> TreeNode<T> {
    /// Create a node without children.
    pub fn leaf(id: impl Into<NodeId>, value: T) -> Self {
        Self {
            id: id.into(),
            value,
            left: None,
            right: None,
        }
    }

    /// Builder-style: set the left child.
    pub fn with_left(mut self, child: TreeNode<T>) -> Self {
        self.left = Some(Arc::new(child));
        self
    }

    /// Builder-style: set the right child.
    pub fn with_right(mut self, child: TreeNode<T>) -> Self {
        self.right = Some(Arc::new(child));
        self
    }

    /// Builder-style: set the child on `side`.
    pub fn with_child(self, side: Side, child: TreeNode<T>) -> Self {
        match side {
            Side::Left => self.with_left(child),
            Side::Right => self.with_right(child),
        }
    }

    /// Child on `side`, if present.
    #[inline]
    pub fn child(&self, side: Side) -> Option<&TreeNode<T>> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    /// True when the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Depth-first search for the node carrying `id`.
    pub fn find(&self, id: &NodeId) -> Option<&TreeNode<T>> {
        if &self.id == id {
            return Some(self);
        }
        self.left
            .as_deref()
            .and_then(|left| left.find(id))
            .or_else(|| self.right.as_deref().and_then(|right| right.find(id)))
    }
}

impl<T: Clone> TreeNode<T> {
    /// Return a new tree with `child` attached at `parent`'s empty `side` slot.
    ///
    /// `self` is left untouched; the result shares every subtree that is not
    /// on the root-to-parent path.
    pub fn attach(
        &self,
        parent: &NodeId,
        side: Side,
        child: TreeNode<T>,
    ) -> Result<TreeNode<T>, TreeError> {
        self.check_slot(parent, side)?;
        let child = Arc::new(child);
        self.replace_slot(parent, side, &child)
            .ok_or_else(|| TreeError::UnknownNode(parent.clone()))
    }

    /// Ok when `parent` exists and its `side` child is free.
    pub fn check_slot(&self, parent: &NodeId, side: Side) -> Result<(), TreeError> {
        let target = self
            .find(parent)
            .ok_or_else(|| TreeError::UnknownNode(parent.clone()))?;
        if target.child(side).is_some() {
            return Err(TreeError::SlotOccupied {
                parent: parent.clone(),
                side,
            });
        }
        Ok(())
    }

    fn replace_slot(
        &self,
        parent: &NodeId,
        side: Side,
        child: &Arc<TreeNode<T>>,
    ) -> Option<TreeNode<T>> {
        if &self.id == parent {
            let mut copy = self.clone();
            match side {
                Side::Left => copy.left = Some(Arc::clone(child)),
                Side::Right => copy.right = Some(Arc::clone(child)),
            }
            return Some(copy);
        }

        if let Some(new_left) = self
            .left
            .as_deref()
            .and_then(|left| left.replace_slot(parent, side, child))
        {
            let mut copy = self.clone();
            copy.left = Some(Arc::new(new_left));
            return Some(copy);
        }

        let new_right = self
            .right
            .as_deref()
            .and_then(|right| right.replace_slot(parent, side, child))?;
        let mut copy = self.clone();
        copy.right = Some(Arc::new(new_right));
        Some(copy)
    }
}

/// Monotonic id source: `node-0`, `node-1`, ...
#[derive(Debug, Clone)]
pub struct NodeIdGen {
    prefix: String,
    next: usize,
}

impl NodeIdGen {
    /// Start a new sequence with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Produce the next id in the sequence.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl Default for NodeIdGen {
    fn default() -> Self {
        Self::new("node")
    }
}

/// Check that no id appears twice in the tree.
///
/// Lesson trees are author-controlled, so nothing calls this on the hot
/// path; it exists for content checks and tests.
pub fn validate_structure<T>(root: Option<&TreeNode<T>>) -> Result<(), TreeError> {
    let mut seen = HashSet::new();
    let mut stack: Vec<&TreeNode<T>> = root.into_iter().collect();

    while let Some(node) = stack.pop() {
        if !seen.insert(&node.id) {
            return Err(TreeError::DuplicateId(node.id.clone()));
        }
        stack.extend(node.right.as_deref());
        stack.extend(node.left.as_deref());
    }

    Ok(())
}
