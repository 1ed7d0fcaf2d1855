//! # Tree and graph algorithms for interactive lessons
//!
//! Pure engines behind a set of teaching games: every call takes its inputs
//! explicitly, returns fresh values and never touches a clock, a screen or a
//! network. Randomness is always a caller-supplied `rand::Rng`.
//!
//! ## Components
//!
//! 1. **Tree model and layout**: persistent binary trees with `Arc`-shared
//!    children, midpoint-partition drawing coordinates
//! 2. **BST engine**: building, persistent insertion, slot lookup, validation
//! 3. **Traversals**: inorder/preorder/postorder/BFS/DFS with frontier frames
//! 4. **Graphs**: undirected letter graphs, DFS/BFS order, connected generation
//! 5. **Mazes**: solvable grid generation, BFS shortest paths, path grading
//! 6. **Shape predicates**: complete, balanced, left-skewed, full, perfect
//!
//! Rounds and scoring sit on top and turn the engines into game content.
//!
//! ## Usage Example
//!
//! ```
//! use arborlab::bst;
//! use arborlab::traversal::{traverse, TraversalKind};
//!
//! let tree = bst::build([50, 25, 75, 10, 35]).unwrap();
//! assert_eq!(traverse(Some(&tree), TraversalKind::Inorder), vec![10, 25, 35, 50, 75]);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod tree;      // Tree model and drawing layout
pub mod bst;       // Binary search tree engine
pub mod traversal; // Traversal sequences and step frames
pub mod graph;     // Undirected graphs, DFS/BFS, generation
pub mod maze;      // Grid mazes and shortest paths
pub mod shape;     // Structural predicates
pub mod rounds;    // Game round generators
pub mod scoring;   // Score formulas and sessions
pub mod util;      // Seeding helpers

// Re-exports for convenience
pub use bst::{DuplicatePolicy, InsertionSlot};
pub use graph::{Graph, GraphConfig, GraphError, GraphNode};
pub use maze::{
    Cell, MazeConfig, MazeError, MazeGrid, PathDraft, PathEvaluation, Position, StepOutcome,
};
pub use rounds::RoundError;
pub use scoring::{GameResult, GameType, ScoringError, Session, SessionState};
pub use traversal::{OrderCheck, TraversalKind, TraversalStep};
pub use tree::{LayoutConfig, NodeId, NodeIdGen, NodePosition, Side, TreeError, TreeNode};
