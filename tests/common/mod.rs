#![allow(dead_code)]

use arborlab::maze::{MazeGrid, Position};
use arborlab::tree::TreeNode;

/// `{10, left: {5}, right: {15}}` with ids equal to the values.
pub fn small_bst() -> TreeNode<i32> {
    TreeNode::leaf("10", 10)
        .with_left(TreeNode::leaf("5", 5))
        .with_right(TreeNode::leaf("15", 15))
}

/// Perfect tree of three levels numbered in level order.
pub fn perfect_tree() -> TreeNode<i32> {
    TreeNode::leaf("1", 1)
        .with_left(
            TreeNode::leaf("2", 2)
                .with_left(TreeNode::leaf("4", 4))
                .with_right(TreeNode::leaf("5", 5)),
        )
        .with_right(
            TreeNode::leaf("3", 3)
                .with_left(TreeNode::leaf("6", 6))
                .with_right(TreeNode::leaf("7", 7)),
        )
}

/// Parse a maze fixture, panicking on malformed text.
pub fn grid(text: &str) -> MazeGrid {
    MazeGrid::parse(text).unwrap_or_else(|err| panic!("bad maze fixture: {err}"))
}

/// Cell count of the shortest start-to-end route found by enumerating every
/// simple path.
pub fn brute_force_shortest(grid: &MazeGrid) -> Option<usize> {
    fn walk(grid: &MazeGrid, at: Position, seen: &mut Vec<Position>, best: &mut Option<usize>) {
        if at == grid.end() {
            let len = seen.len();
            *best = Some(best.map_or(len, |b| b.min(len)));
            return;
        }
        if best.is_some_and(|b| seen.len() >= b) {
            return;
        }
        let next: Vec<Position> = grid.neighbors(at).filter(|p| grid.is_open(*p)).collect();
        for pos in next {
            if seen.contains(&pos) {
                continue;
            }
            seen.push(pos);
            walk(grid, pos, seen, best);
            seen.pop();
        }
    }

    let mut best = None;
    let mut seen = vec![grid.start()];
    walk(grid, grid.start(), &mut seen, &mut best);
    best
}
