//! Binary tree model and layout
//!
//! Trees are persistent: every structural edit path-copies from the root
//! down to the edited node and shares all untouched subtrees through `Arc`.
//! A tree handed out earlier is never mutated by a later edit.

mod layout;
mod node;

pub use layout::{empty_slots, layout, EmptySlot, LayoutConfig, NodePosition};
pub use node::{validate_structure, NodeId, NodeIdGen, Side, Subtree, TreeNode};

use thiserror::Error;

/// Errors raised by structural edits and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Referenced node id does not exist in the tree.
    #[error("no node with id '{0}' in tree")]
    UnknownNode(NodeId),

    /// The requested child slot already holds a node.
    #[error("{side} slot of node '{parent}' is already occupied")]
    SlotOccupied {
        /// Parent whose slot was requested.
        parent: NodeId,
        /// Which child slot was requested.
        side: Side,
    },

    /// Two nodes share the same id.
    #[error("duplicate node id '{0}'")]
    DuplicateId(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_node() {
        let err = TreeError::SlotOccupied {
            parent: NodeId::from("root"),
            side: Side::Left,
        };
        assert_eq!(err.to_string(), "left slot of node 'root' is already occupied");
        assert_eq!(
            TreeError::UnknownNode(NodeId::from("x")).to_string(),
            "no node with id 'x' in tree"
        );
    }
}
