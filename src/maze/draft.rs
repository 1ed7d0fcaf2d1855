//! Player path built one cell at a time
//!
//! Rules per step, checked in order:
//! 1. finished drafts accept nothing
//! 2. out-of-bounds and wall cells are ignored
//! 3. the cell must be one orthogonal step from the current head
//! 4. stepping onto the previous cell undoes the last step
//! 5. otherwise the cell is appended; landing on the end finishes the draft

use super::{evaluate_user_path, MazeGrid, PathEvaluation, Position};

/// Result of offering one cell to a [`PathDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Cell appended.
    Extended,
    /// Previous cell re-entered; last step removed.
    Backtracked,
    /// Cell appended and it is the end.
    ReachedEnd,
    /// Cell is a wall.
    RejectedWall,
    /// Cell is not adjacent to the head.
    RejectedNotAdjacent,
    /// Cell lies outside the grid.
    RejectedOutOfBounds,
    /// The draft already reached the end.
    AlreadyFinished,
}

impl StepOutcome {
    /// The draft changed.
    pub fn accepted(self) -> bool {
        matches!(self, Self::Extended | Self::Backtracked | Self::ReachedEnd)
    }
}

/// Path under construction, always starting at the grid's start cell.
#[derive(Debug, Clone)]
pub struct PathDraft<'g> {
    grid: &'g MazeGrid,
    cells: Vec<Position>,
    finished: bool,
}

impl<'g> PathDraft<'g> {
    /// Draft containing only the start cell.
    pub fn new(grid: &'g MazeGrid) -> Self {
        Self {
            grid,
            cells: vec![grid.start()],
            finished: false,
        }
    }

    /// Cells so far, start first.
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Current head.
    pub fn head(&self) -> Position {
        self.cells.last().copied().unwrap_or_else(|| self.grid.start())
    }

    /// End has been reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Offer the next cell.
    pub fn step(&mut self, pos: Position) -> StepOutcome {
        if self.finished {
            return StepOutcome::AlreadyFinished;
        }
        let Some(cell) = self.grid.get(pos) else {
            return StepOutcome::RejectedOutOfBounds;
        };
        if !cell.is_open() {
            return StepOutcome::RejectedWall;
        }
        if !self.head().is_adjacent(pos) {
            return StepOutcome::RejectedNotAdjacent;
        }

        let len = self.cells.len();
        if len > 1 && self.cells[len - 2] == pos {
            self.cells.pop();
            return StepOutcome::Backtracked;
        }

        self.cells.push(pos);
        if pos == self.grid.end() {
            self.finished = true;
            StepOutcome::ReachedEnd
        } else {
            StepOutcome::Extended
        }
    }

    /// Score the path as it stands.
    pub fn evaluate(&self) -> PathEvaluation {
        evaluate_user_path(self.grid, &self.cells)
    }

    /// Grid copy with the drafted cells marked.
    pub fn render(&self) -> MazeGrid {
        self.grid.with_path_marked(&self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn grid() -> MazeGrid {
        MazeGrid::parse("S#.\n...\n..E").unwrap()
    }

    #[test]
    fn test_walk_to_end() {
        let grid = grid();
        let mut draft = PathDraft::new(&grid);
        assert_eq!(draft.step(p(1, 0)), StepOutcome::Extended);
        assert_eq!(draft.step(p(1, 1)), StepOutcome::Extended);
        assert_eq!(draft.step(p(2, 1)), StepOutcome::Extended);
        assert_eq!(draft.step(p(2, 2)), StepOutcome::ReachedEnd);
        assert!(draft.is_finished());
        assert_eq!(draft.step(p(1, 2)), StepOutcome::AlreadyFinished);

        let eval = draft.evaluate();
        assert!(eval.reached_end);
        assert_eq!(eval.efficiency, 1.0);
    }

    #[test]
    fn test_rejections_leave_draft_unchanged() {
        let grid = grid();
        let mut draft = PathDraft::new(&grid);
        assert_eq!(draft.step(p(0, 1)), StepOutcome::RejectedWall);
        assert_eq!(draft.step(p(2, 2)), StepOutcome::RejectedNotAdjacent);
        assert_eq!(draft.step(p(0, 3)), StepOutcome::RejectedOutOfBounds);
        assert!(!draft.step(p(0, 0)).accepted());
        assert_eq!(draft.cells(), &[p(0, 0)]);
    }

    #[test]
    fn test_backtrack_to_previous_cell() {
        let grid = grid();
        let mut draft = PathDraft::new(&grid);
        draft.step(p(1, 0));
        draft.step(p(1, 1));
        assert_eq!(draft.step(p(1, 0)), StepOutcome::Backtracked);
        assert_eq!(draft.cells(), &[p(0, 0), p(1, 0)]);
        assert_eq!(draft.step(p(0, 0)), StepOutcome::Backtracked);
        assert_eq!(draft.head(), p(0, 0));
    }

    #[test]
    fn test_render_marks_cells() {
        let grid = grid();
        let mut draft = PathDraft::new(&grid);
        draft.step(p(1, 0));
        assert_eq!(draft.render().to_string(), "S#.\n*..\n..E\n");
    }
}
