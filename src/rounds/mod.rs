//! Round generators for every game mode
//!
//! Round number doubles as difficulty:
//!   bst insert nodes  = min(3 + round/2, 7)
//!   tree builder goal = min(3 + level, 8), BST rules from level 5
//!   dfs graph nodes   = min(4 + round/2, 7)
//!
//! Generated values are integers in [10, 100).

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::bst::{self, DuplicatePolicy, InsertionSlot};
use crate::graph::{dfs_order, generate_graph, letter_id, Graph, GraphConfig, GraphError};
use crate::maze::{
    generate_maze, shortest_path, MazeConfig, MazeError, MazeGrid, PathDraft, Position,
};
use crate::shape;
use crate::traversal::{check_order, traverse, OrderCheck, TraversalKind};
use crate::tree::{NodeId, NodeIdGen, Side, TreeError, TreeNode};
use crate::util::{distinct_values, fresh_value};

/// Smallest generated value.
pub const VALUE_MIN: i32 = 10;
/// One past the largest generated value.
pub const VALUE_MAX: i32 = 100;

/// Seconds per BST insert round.
pub const BST_INSERT_SECONDS: u32 = 20;
/// Seconds per tree builder level.
pub const TREE_BUILDER_SECONDS: u32 = 45;
/// Seconds per traversal race round.
pub const TRAVERSAL_RACE_SECONDS: u32 = 45;
/// Seconds per DFS order or find-the-BST round.
pub const GRAPH_ROUND_SECONDS: u32 = 30;
/// Seconds per pathfinder level.
pub const PATHFINDER_SECONDS: u32 = 60;

/// First tree builder level played with BST rules.
pub const BST_MODE_FROM_LEVEL: u32 = 5;

/// Kinds drawn for the traversal race.
pub const RACE_KINDS: [TraversalKind; 4] = [
    TraversalKind::Inorder,
    TraversalKind::Preorder,
    TraversalKind::Postorder,
    TraversalKind::Bfs,
];

/// Trees offered per find-the-BST round.
pub const FIND_BST_CHOICES: usize = 3;
/// Chance that a decoy tree grows each child.
pub const DECOY_CHILD_PROBABILITY: f64 = 0.7;

const MAX_DECOY_ATTEMPTS: usize = 1_000;

/// Errors from round generation and play.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoundError {
    /// Not enough distinct values left in the value range.
    #[error("cannot draw {count} distinct values from [10, 100)")]
    ValueRangeExhausted {
        /// Values requested.
        count: usize,
    },

    /// Find-the-BST depth outside the supported range.
    #[error("find-the-BST depth must be within 2..=6, got {0}")]
    InvalidDepth(usize),

    /// Decoy generation kept producing valid BSTs.
    #[error("no non-BST decoy found after {0} attempts")]
    DecoyStalled(usize),

    /// Tree construction was handed no values.
    #[error("no values to build a tree from")]
    NoValues,

    /// Generated maze came back without a start-to-end path.
    #[error("generated maze has no path")]
    Unsolvable,

    /// Placement attempted after the level goal was met.
    #[error("level already complete")]
    LevelFinished,

    /// Tree edit failed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Graph generation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Maze generation failed.
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Tree size for a BST insert round.
pub fn bst_insert_node_count(round: u32) -> usize {
    (3 + round as usize / 2).min(7)
}

/// "Where does this value go?" round.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BstInsertRound {
    /// Round number.
    pub round: u32,
    /// BST built from distinct values.
    pub tree: TreeNode<i32>,
    /// Value to place, absent from the tree.
    pub value: i32,
    /// The one correct slot.
    pub slot: InsertionSlot,
    /// Seconds on the clock.
    pub time_limit: u32,
}

impl BstInsertRound {
    /// Whether the chosen slot is the correct one.
    pub fn check(&self, chosen: &InsertionSlot) -> bool {
        &self.slot == chosen
    }
}

/// Generate a BST insert round.
#[instrument(level = "trace", skip(rng))]
pub fn bst_insert_round<R: Rng + ?Sized>(
    rng: &mut R,
    round: u32,
) -> Result<BstInsertRound, RoundError> {
    let count = bst_insert_node_count(round);
    let values = distinct_values(rng, VALUE_MIN, VALUE_MAX, count)
        .ok_or(RoundError::ValueRangeExhausted { count })?;
    let tree = bst::build(values.iter().copied()).ok_or(RoundError::NoValues)?;
    let value = fresh_value(rng, VALUE_MIN, VALUE_MAX, &values)
        .ok_or(RoundError::ValueRangeExhausted { count: count + 1 })?;
    let slot = bst::find_insertion_slot(Some(&tree), &value, DuplicatePolicy::Reject)
        .ok_or(RoundError::ValueRangeExhausted { count: count + 1 })?;

    debug!(round, value, parent = %slot.parent_id, side = %slot.side, "bst insert round");
    Ok(BstInsertRound {
        round,
        tree,
        value,
        slot,
        time_limit: BST_INSERT_SECONDS,
    })
}

/// Placement rules of a tree builder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildMode {
    /// Any empty slot is accepted.
    Binary,
    /// Only the BST insertion slot is accepted.
    Bst,
}

impl BuildMode {
    /// Mode for a level number.
    pub fn for_level(level: u32) -> Self {
        if level >= BST_MODE_FROM_LEVEL {
            BuildMode::Bst
        } else {
            BuildMode::Binary
        }
    }
}

/// Value waiting to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed {
    /// The value.
    pub value: i32,
    /// Required slot in BST mode; `None` in binary mode.
    pub slot: Option<InsertionSlot>,
}

/// Outcome of a tree builder placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Seed placed, a new seed is waiting.
    Placed,
    /// Seed placed and the level goal reached.
    LevelComplete,
    /// BST mode and the slot was not the insertion slot; nothing changed.
    WrongSlot {
        /// Where the seed belongs.
        expected: InsertionSlot,
    },
}

/// Tree builder level in progress.
#[derive(Debug, Clone)]
pub struct TreeBuilderLevel {
    /// Level number.
    pub level: u32,
    /// Placement rules.
    pub mode: BuildMode,
    /// Node count that completes the level.
    pub nodes_needed: usize,
    /// Seconds on the clock.
    pub time_limit: u32,
    tree: TreeNode<i32>,
    seed: Seed,
    ids: NodeIdGen,
}

/// Start a tree builder level: a lone root in [30, 70) and a first seed.
#[instrument(level = "trace", skip(rng))]
pub fn tree_builder_level<R: Rng + ?Sized>(
    rng: &mut R,
    level: u32,
) -> Result<TreeBuilderLevel, RoundError> {
    let mode = BuildMode::for_level(level);
    let tree = TreeNode::leaf("root", rng.gen_range(30..70));
    let seed = next_seed(rng, &tree, mode)?;
    Ok(TreeBuilderLevel {
        level,
        mode,
        nodes_needed: (3 + level as usize).min(8),
        time_limit: TREE_BUILDER_SECONDS,
        tree,
        seed,
        ids: NodeIdGen::default(),
    })
}

/// Draw the next value to place.
///
/// BST mode draws a value absent from the tree and reports its slot.
pub fn next_seed<R: Rng + ?Sized>(
    rng: &mut R,
    tree: &TreeNode<i32>,
    mode: BuildMode,
) -> Result<Seed, RoundError> {
    match mode {
        BuildMode::Binary => Ok(Seed {
            value: rng.gen_range(VALUE_MIN..VALUE_MAX),
            slot: None,
        }),
        BuildMode::Bst => {
            let taken = traverse(Some(tree), TraversalKind::Preorder);
            let exhausted = RoundError::ValueRangeExhausted {
                count: taken.len() + 1,
            };
            let value = fresh_value(rng, VALUE_MIN, VALUE_MAX, &taken)
                .ok_or_else(|| exhausted.clone())?;
            let slot = bst::find_insertion_slot(Some(tree), &value, DuplicatePolicy::Reject)
                .ok_or(exhausted)?;
            Ok(Seed {
                value,
                slot: Some(slot),
            })
        }
    }
}

impl TreeBuilderLevel {
    /// Tree so far.
    pub fn tree(&self) -> &TreeNode<i32> {
        &self.tree
    }

    /// Value waiting to be placed.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Goal reached.
    pub fn is_complete(&self) -> bool {
        shape::node_count(Some(&self.tree)) >= self.nodes_needed
    }

    /// Place the current seed under `parent` on `side`.
    ///
    /// Unknown parents and occupied slots are errors and leave the level
    /// unchanged, as does a wrong slot in BST mode.
    pub fn place<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        parent: &NodeId,
        side: Side,
    ) -> Result<Placement, RoundError> {
        if self.is_complete() {
            return Err(RoundError::LevelFinished);
        }

        self.tree.check_slot(parent, side)?;
        if let Some(expected) = &self.seed.slot {
            if expected.parent_id != *parent || expected.side != side {
                trace!(%parent, %side, "wrong slot in bst mode");
                return Ok(Placement::WrongSlot {
                    expected: expected.clone(),
                });
            }
        }

        let leaf = TreeNode::leaf(self.ids.next_id(), self.seed.value);
        self.tree = self.tree.attach(parent, side, leaf)?;
        if self.is_complete() {
            debug!(level = self.level, "tree builder level complete");
            return Ok(Placement::LevelComplete);
        }
        self.seed = next_seed(rng, &self.tree, self.mode)?;
        Ok(Placement::Placed)
    }
}

/// "Click the values in traversal order" round.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversalRaceRound {
    /// Five-node tree.
    pub tree: TreeNode<i32>,
    /// Order to reproduce.
    pub kind: TraversalKind,
    /// Expected value order.
    pub expected: Vec<i32>,
    /// The same values, shuffled, as offered to the player.
    pub choices: Vec<i32>,
    /// Seconds on the clock.
    pub time_limit: u32,
}

impl TraversalRaceRound {
    /// Grade a (possibly partial) submission.
    pub fn check(&self, submitted: &[i32]) -> OrderCheck {
        check_order(&self.expected, submitted)
    }
}

/// Generate a traversal race round.
///
/// Shape: root with two children, the left child with two children.
/// Values are five distinct picks from 1..=7.
pub fn traversal_race_round<R: Rng + ?Sized>(rng: &mut R) -> TraversalRaceRound {
    let mut pool: Vec<i32> = (1..=7).collect();
    pool.shuffle(rng);

    let tree = TreeNode::leaf("1", pool[0])
        .with_left(
            TreeNode::leaf("2", pool[1])
                .with_left(TreeNode::leaf("4", pool[3]))
                .with_right(TreeNode::leaf("5", pool[4])),
        )
        .with_right(TreeNode::leaf("3", pool[2]));

    let kind = RACE_KINDS[rng.gen_range(0..RACE_KINDS.len())];
    let expected = traverse(Some(&tree), kind);
    let mut choices = expected.clone();
    choices.shuffle(rng);

    TraversalRaceRound {
        tree,
        kind,
        expected,
        choices,
        time_limit: TRAVERSAL_RACE_SECONDS,
    }
}

/// One tree offered in a find-the-BST round.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeChoice {
    /// The tree.
    pub tree: TreeNode<i32>,
    /// Whether it satisfies the BST ordering.
    pub is_bst: bool,
}

/// "Which of these trees is a BST?" round.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FindBstRound {
    /// Offered trees; exactly one is a BST.
    pub trees: Vec<TreeChoice>,
    /// Index of the BST in `trees`.
    pub answer: usize,
    /// Seconds on the clock.
    pub time_limit: u32,
}

impl FindBstRound {
    /// Whether `index` picks the BST.
    pub fn check(&self, index: usize) -> bool {
        index == self.answer
    }
}

/// Generate a find-the-BST round with trees of up to `depth` levels.
///
/// The BST is perfectly balanced over `2^depth - 1` distinct values. Each
/// decoy grows each child with probability 0.7 and is redrawn while it
/// happens to be a BST.
#[instrument(level = "trace", skip(rng))]
pub fn find_bst_round<R: Rng + ?Sized>(
    rng: &mut R,
    depth: usize,
) -> Result<FindBstRound, RoundError> {
    if !(2..=6).contains(&depth) {
        return Err(RoundError::InvalidDepth(depth));
    }
    let answer = rng.gen_range(0..FIND_BST_CHOICES);
    let mut trees = Vec::with_capacity(FIND_BST_CHOICES);

    for index in 0..FIND_BST_CHOICES {
        let tree = if index == answer {
            let count = (1usize << depth) - 1;
            let values = distinct_values(rng, VALUE_MIN, VALUE_MAX, count)
                .ok_or(RoundError::ValueRangeExhausted { count })?;
            bst::build_balanced(&values, &mut NodeIdGen::new("bst")).ok_or(RoundError::NoValues)?
        } else {
            decoy_tree(rng, depth)?
        };
        trees.push(TreeChoice {
            is_bst: index == answer,
            tree,
        });
    }

    Ok(FindBstRound {
        trees,
        answer,
        time_limit: GRAPH_ROUND_SECONDS,
    })
}

fn decoy_tree<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Result<TreeNode<i32>, RoundError> {
    for attempt in 0..MAX_DECOY_ATTEMPTS {
        let mut ids = NodeIdGen::default();
        let tree = random_tree(rng, depth, &mut ids).unwrap_or_else(|| TreeNode::leaf("root", 50));
        if !bst::is_valid_bst(Some(&tree)) {
            return Ok(tree);
        }
        trace!(attempt, "decoy happened to be a BST, redrawing");
    }
    Err(RoundError::DecoyStalled(MAX_DECOY_ATTEMPTS))
}

fn random_tree<R: Rng + ?Sized>(
    rng: &mut R,
    depth: usize,
    ids: &mut NodeIdGen,
) -> Option<TreeNode<i32>> {
    if depth == 0 || !rng.gen_bool(DECOY_CHILD_PROBABILITY) {
        return None;
    }
    let mut node = TreeNode::leaf(ids.next_id(), rng.gen_range(VALUE_MIN..VALUE_MAX));
    if let Some(left) = random_tree(rng, depth - 1, ids) {
        node = node.with_left(left);
    }
    if let Some(right) = random_tree(rng, depth - 1, ids) {
        node = node.with_right(right);
    }
    Some(node)
}

/// "Click the nodes in DFS order" round.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DfsGraphRound {
    /// Connected graph.
    pub graph: Graph,
    /// Where the search starts.
    pub start: NodeId,
    /// Expected visit order.
    pub expected: Vec<NodeId>,
    /// Seconds on the clock.
    pub time_limit: u32,
}

impl DfsGraphRound {
    /// Grade a (possibly partial) submission.
    pub fn check(&self, submitted: &[NodeId]) -> OrderCheck {
        check_order(&self.expected, submitted)
    }
}

/// Generate a DFS order round.
pub fn dfs_graph_round<R: Rng + ?Sized>(
    rng: &mut R,
    round: u32,
) -> Result<DfsGraphRound, RoundError> {
    let graph = generate_graph(rng, &GraphConfig::for_round(round))?;
    let start = letter_id(0);
    let expected = dfs_order(&graph, &start);
    Ok(DfsGraphRound {
        graph,
        start,
        expected,
        time_limit: GRAPH_ROUND_SECONDS,
    })
}

/// Maze level with its reference solution.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfinderLevel {
    /// The maze.
    pub grid: MazeGrid,
    /// One shortest start-to-end route.
    pub shortest: Vec<Position>,
    /// Seconds on the clock.
    pub time_limit: u32,
}

impl PathfinderLevel {
    /// Fresh player path seeded at the start cell.
    pub fn draft(&self) -> PathDraft<'_> {
        PathDraft::new(&self.grid)
    }
}

/// Generate a pathfinder level.
pub fn pathfinder_level<R: Rng + ?Sized>(
    rng: &mut R,
    config: &MazeConfig,
) -> Result<PathfinderLevel, RoundError> {
    let grid = generate_maze(rng, config)?;
    let shortest = shortest_path(&grid).ok_or(RoundError::Unsolvable)?;
    Ok(PathfinderLevel {
        grid,
        shortest,
        time_limit: PATHFINDER_SECONDS,
    })
}
