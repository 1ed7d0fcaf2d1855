//! Maze grids and shortest paths
//!
//! Grid = size × size cells, start fixed at (0, 0), end at (size-1, size-1).
//! Movement is 4-directional, walls are impassable, every step costs 1.
//!
//! Generated grids are always solvable: when random walls cut the start off
//! from the end, a staircase (i,i) → (i,i+1) → (i+1,i+1) … is carved open.

mod draft;

pub use draft::{PathDraft, StepOutcome};

use std::collections::VecDeque;
use std::fmt;

use bitvec::prelude::*;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from maze configuration and parsing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MazeError {
    /// Grid must be at least 2×2 so that start and end differ.
    #[error("maze size must be at least 2, got {0}")]
    InvalidSize(usize),

    /// Wall probability outside [0, 1].
    #[error("wall probability must be within [0, 1], got {0}")]
    InvalidWallProbability(f64),

    /// Parsed rows are not a square grid.
    #[error("maze rows must form a square grid: row {row} has {found} cells, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Cells in that row.
        found: usize,
        /// Cells expected per row.
        expected: usize,
    },

    /// Unknown cell character while parsing.
    #[error("unknown maze cell '{ch}' at ({row}, {col})")]
    UnknownCell {
        /// Character encountered.
        ch: char,
        /// Row of the character.
        row: usize,
        /// Column of the character.
        col: usize,
    },

    /// Cell list does not cover a size × size grid.
    #[error("maze of size {size} needs {expected} cells, got {found}")]
    CellCount {
        /// Declared side length.
        size: usize,
        /// Cells supplied.
        found: usize,
        /// size × size.
        expected: usize,
    },

    /// Start or end marker missing or misplaced.
    #[error("maze must have exactly one start at (0, 0) and one end at the opposite corner")]
    MisplacedEndpoints,
}

/// Content of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Cell {
    /// Open floor.
    Empty,
    /// Impassable.
    Wall,
    /// Fixed start corner.
    Start,
    /// Fixed end corner.
    End,
    /// Floor marked as part of the player's path.
    Path,
}

impl Cell {
    /// Can be stepped on.
    #[inline]
    pub fn is_open(self) -> bool {
        self != Cell::Wall
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Start => 'S',
            Cell::End => 'E',
            Cell::Path => '*',
        }
    }

    fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            'S' => Some(Cell::Start),
            'E' => Some(Cell::End),
            '*' => Some(Cell::Path),
            _ => None,
        }
    }
}

/// Grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Row index (0 at the top).
    pub row: usize,
    /// Column index (0 at the left).
    pub col: usize,
}

impl Position {
    /// Construct a position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Exactly one orthogonal step apart.
    #[inline]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Generation parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MazeConfig {
    /// Side length of the square grid.
    pub size: usize,
    /// Independent chance of each non-endpoint cell being a wall.
    pub wall_probability: f64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: 8,
            wall_probability: 0.25,
        }
    }
}

impl MazeConfig {
    /// Validated configuration.
    pub fn new(size: usize, wall_probability: f64) -> Result<Self, MazeError> {
        let config = Self {
            size,
            wall_probability,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check bounds.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.size < 2 {
            return Err(MazeError::InvalidSize(self.size));
        }
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(MazeError::InvalidWallProbability(self.wall_probability));
        }
        Ok(())
    }
}

/// Square maze grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMazeGrid"))]
pub struct MazeGrid {
    size: usize,
    cells: Vec<Cell>,
}

/// Unchecked wire form; deserialized grids pass through [`MazeGrid::from_cells`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMazeGrid {
    size: usize,
    cells: Vec<Cell>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMazeGrid> for MazeGrid {
    type Error = MazeError;

    fn try_from(raw: RawMazeGrid) -> Result<Self, Self::Error> {
        Self::from_cells(raw.size, raw.cells)
    }
}

impl MazeGrid {
    /// Grid without walls.
    pub fn open(size: usize) -> Result<Self, MazeError> {
        if size < 2 {
            return Err(MazeError::InvalidSize(size));
        }
        let mut cells = vec![Cell::Empty; size * size];
        cells[0] = Cell::Start;
        cells[size * size - 1] = Cell::End;
        Ok(Self { size, cells })
    }

    /// Parse rows of `.`, `#`, `S`, `E`, `*`. Blank lines and surrounding
    /// whitespace are ignored.
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let size = rows.len();
        if size < 2 {
            return Err(MazeError::InvalidSize(size));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != size {
                return Err(MazeError::NotSquare {
                    row,
                    found,
                    expected: size,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::from_symbol(ch).ok_or(MazeError::UnknownCell { ch, row, col })?;
                cells.push(cell);
            }
        }

        Self::from_cells(size, cells)
    }

    /// Grid from row-major cells, checked like [`MazeGrid::parse`]: at least
    /// 2×2, exactly `size²` cells, one start at (0, 0) and one end at the
    /// opposite corner.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, MazeError> {
        if size < 2 {
            return Err(MazeError::InvalidSize(size));
        }
        let expected = size * size;
        if cells.len() != expected {
            return Err(MazeError::CellCount {
                size,
                found: cells.len(),
                expected,
            });
        }

        let grid = Self { size, cells };
        let starts = grid.cells.iter().filter(|c| **c == Cell::Start).count();
        let ends = grid.cells.iter().filter(|c| **c == Cell::End).count();
        let corners = grid.get(grid.start()) == Some(Cell::Start)
            && grid.get(grid.end()) == Some(Cell::End);
        if starts != 1 || ends != 1 || !corners {
            return Err(MazeError::MisplacedEndpoints);
        }
        Ok(grid)
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Start corner.
    pub fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// End corner.
    pub fn end(&self) -> Position {
        Position::new(self.size - 1, self.size - 1)
    }

    /// Cell at `pos`, `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Inside the grid and not a wall.
    pub fn is_open(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Cell::is_open)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.row < self.size && pos.col < self.size).then(|| pos.row * self.size + pos.col)
    }

    fn position(&self, idx: usize) -> Position {
        Position::new(idx / self.size, idx % self.size)
    }

    /// In-bounds orthogonal neighbors: up, down, left, right.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        let up = pos.row.checked_sub(1).map(|row| Position::new(row, pos.col));
        let down = Some(Position::new(pos.row + 1, pos.col));
        let left = pos.col.checked_sub(1).map(|col| Position::new(pos.row, col));
        let right = Some(Position::new(pos.row, pos.col + 1));
        [up, down, left, right]
            .into_iter()
            .flatten()
            .filter(move |next| self.index(*next).is_some())
    }

    fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = cell;
        }
    }

    /// Copy of the grid with the open cells of `path` marked as [`Cell::Path`].
    /// Start and end keep their markers; walls are left as they are.
    pub fn with_path_marked(&self, path: &[Position]) -> MazeGrid {
        let mut grid = self.clone();
        for &pos in path {
            if grid.get(pos) == Some(Cell::Empty) {
                grid.set(pos, Cell::Path);
            }
        }
        grid
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Wall).count()
    }

    /// Row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Random maze, repaired until solvable.
#[instrument(level = "trace", skip(rng))]
pub fn generate_maze<R: Rng + ?Sized>(
    rng: &mut R,
    config: &MazeConfig,
) -> Result<MazeGrid, MazeError> {
    config.validate()?;
    let mut grid = MazeGrid::open(config.size)?;
    let (start, end) = (grid.start(), grid.end());

    for idx in 0..grid.cells.len() {
        let pos = grid.position(idx);
        if pos == start || pos == end {
            continue;
        }
        if rng.gen_bool(config.wall_probability) {
            grid.cells[idx] = Cell::Wall;
        }
    }

    if !has_path(&grid) {
        let cleared = carve_staircase(&mut grid);
        debug!(cleared, size = config.size, "maze had no path, carved staircase");
    }
    Ok(grid)
}

/// Open (i,i) and (i,i+1) for every i, a 4-connected start→end route.
fn carve_staircase(grid: &mut MazeGrid) -> usize {
    let mut cleared = 0;
    for i in 0..grid.size {
        for pos in [Position::new(i, i), Position::new(i, i + 1)] {
            if grid.get(pos) == Some(Cell::Wall) {
                grid.set(pos, Cell::Empty);
                cleared += 1;
            }
        }
    }
    cleared
}

/// BFS from start; `Some(predecessors)` when the end is reached.
fn search(grid: &MazeGrid) -> Option<Vec<Option<usize>>> {
    let total = grid.size * grid.size;
    let start = grid.index(grid.start())?;
    let end = grid.index(grid.end())?;

    let mut visited = bitvec![0; total];
    let mut predecessor: Vec<Option<usize>> = vec![None; total];
    let mut queue = VecDeque::from([start]);
    visited.set(start, true);

    while let Some(idx) = queue.pop_front() {
        if idx == end {
            return Some(predecessor);
        }
        for next in grid.neighbors(grid.position(idx)) {
            let Some(next_idx) = grid.index(next) else {
                continue;
            };
            if visited[next_idx] || !grid.cells[next_idx].is_open() {
                continue;
            }
            visited.set(next_idx, true);
            predecessor[next_idx] = Some(idx);
            queue.push_back(next_idx);
        }
    }
    None
}

/// Whether the end is reachable from the start.
pub fn has_path(grid: &MazeGrid) -> bool {
    search(grid).is_some()
}

/// Fewest-cells route from start to end, both included.
pub fn shortest_path(grid: &MazeGrid) -> Option<Vec<Position>> {
    let predecessor = search(grid)?;
    let mut path = Vec::new();
    let mut current = grid.index(grid.end());
    while let Some(idx) = current {
        path.push(grid.position(idx));
        current = predecessor[idx];
    }
    path.reverse();
    Some(path)
}

/// Verdict on a player-drawn path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathEvaluation {
    /// Starts at the start cell, stays in bounds, avoids walls, moves one
    /// orthogonal step at a time.
    pub valid: bool,
    /// Valid and ends on the end cell.
    pub reached_end: bool,
    /// `shortest / submitted` cell counts when the end was reached, else 0.
    pub efficiency: f64,
    /// Cells in the submitted path.
    pub length: usize,
}

/// Check a submitted path and score its efficiency.
pub fn evaluate_user_path(grid: &MazeGrid, path: &[Position]) -> PathEvaluation {
    let valid = path.first() == Some(&grid.start())
        && path.iter().all(|pos| grid.is_open(*pos))
        && path.windows(2).all(|pair| pair[0].is_adjacent(pair[1]));
    let reached_end = valid && path.last() == Some(&grid.end());

    let efficiency = if reached_end {
        shortest_path(grid).map_or(0.0, |best| best.len() as f64 / path.len() as f64)
    } else {
        0.0
    };

    PathEvaluation {
        valid,
        reached_end,
        efficiency,
        length: path.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::seeded_rng;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_open_grid_shortest_path_is_manhattan() {
        let grid = MazeGrid::open(3).unwrap();
        let path = shortest_path(&grid).expect("open grid is solvable");
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&p(0, 0)));
        assert_eq!(path.last(), Some(&p(2, 2)));
        assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
    }

    #[test]
    fn test_walls_force_detour() {
        let grid = MazeGrid::parse(
            "
            S..
            ##.
            ..E
            ",
        )
        .unwrap();
        assert_eq!(
            shortest_path(&grid).unwrap(),
            vec![p(0, 0), p(0, 1), p(0, 2), p(1, 2), p(2, 2)]
        );
    }

    #[test]
    fn test_blocked_grid_has_no_path() {
        let grid = MazeGrid::parse("S#\n#E").unwrap();
        assert!(!has_path(&grid));
        assert_eq!(shortest_path(&grid), None);
    }

    #[test]
    fn test_staircase_repair_makes_solvable() {
        let mut grid = MazeGrid::parse("S###\n####\n####\n###E").unwrap();
        carve_staircase(&mut grid);
        let path = shortest_path(&grid).expect("staircase is connected");
        assert_eq!(path.len(), 7);
    }

    #[test]
    fn test_generated_mazes_are_solvable() {
        let mut rng = seeded_rng(42);
        for probability in [0.0, 0.25, 0.6, 1.0] {
            let config = MazeConfig::new(8, probability).unwrap();
            for _ in 0..20 {
                let grid = generate_maze(&mut rng, &config).unwrap();
                assert!(has_path(&grid));
                assert_eq!(grid.get(grid.start()), Some(Cell::Start));
                assert_eq!(grid.get(grid.end()), Some(Cell::End));
            }
        }
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(MazeConfig::new(1, 0.2), Err(MazeError::InvalidSize(1)));
        assert!(matches!(
            MazeConfig::new(8, 1.5),
            Err(MazeError::InvalidWallProbability(_))
        ));
        assert!(MazeConfig::new(8, f64::NAN).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(MazeGrid::parse("S.\n.E.\n"), Err(MazeError::NotSquare { .. })));
        assert!(matches!(MazeGrid::parse("S?\n.E"), Err(MazeError::UnknownCell { ch: '?', .. })));
        assert_eq!(MazeGrid::parse("E.\n.S"), Err(MazeError::MisplacedEndpoints));
    }

    #[test]
    fn test_from_cells_rejects_malformed_grids() {
        use Cell::{Empty, End, Start};

        assert_eq!(
            MazeGrid::from_cells(3, vec![Start]),
            Err(MazeError::CellCount {
                size: 3,
                found: 1,
                expected: 9
            })
        );
        assert_eq!(MazeGrid::from_cells(1, vec![Start]), Err(MazeError::InvalidSize(1)));
        assert_eq!(
            MazeGrid::from_cells(2, vec![Empty, Start, Empty, End]),
            Err(MazeError::MisplacedEndpoints)
        );
        assert_eq!(
            MazeGrid::from_cells(2, vec![Start, End, Empty, End]),
            Err(MazeError::MisplacedEndpoints)
        );

        let grid = MazeGrid::from_cells(2, vec![Start, Empty, Empty, End]).unwrap();
        assert_eq!(grid, MazeGrid::open(2).unwrap());
        assert!(has_path(&grid));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_grid() {
        let short = serde_json::from_str::<MazeGrid>(r#"{"size":3,"cells":["start"]}"#);
        assert!(short.is_err());

        let swapped = serde_json::from_str::<MazeGrid>(
            r#"{"size":2,"cells":["end","empty","empty","start"]}"#,
        );
        assert!(swapped.is_err());

        let grid = MazeGrid::parse("S#\n.E").unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: MazeGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert_eq!(shortest_path(&back).map(|path| path.len()), Some(3));
    }

    #[test]
    fn test_display_round_trips() {
        let text = "S.#\n.#.\n..E\n";
        let grid = MazeGrid::parse(text).unwrap();
        assert_eq!(grid.to_string(), text);
        assert_eq!(grid.wall_count(), 2);
    }

    #[test]
    fn test_evaluate_optimal_and_detour() {
        let grid = MazeGrid::open(3).unwrap();
        let best = shortest_path(&grid).unwrap();
        let eval = evaluate_user_path(&grid, &best);
        assert!(eval.valid && eval.reached_end);
        assert_eq!(eval.efficiency, 1.0);

        let detour = [p(0, 0), p(0, 1), p(1, 1), p(1, 0), p(2, 0), p(2, 1), p(2, 2)];
        let eval = evaluate_user_path(&grid, &detour);
        assert!(eval.reached_end);
        assert!((eval.efficiency - 5.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_rejects_bad_paths() {
        let grid = MazeGrid::parse("S#.\n...\n..E").unwrap();
        let jump = evaluate_user_path(&grid, &[p(0, 0), p(1, 1)]);
        assert!(!jump.valid);

        let through_wall = evaluate_user_path(&grid, &[p(0, 0), p(0, 1)]);
        assert!(!through_wall.valid);

        let wrong_start = evaluate_user_path(&grid, &[p(1, 0), p(2, 0)]);
        assert!(!wrong_start.valid);

        let unfinished = evaluate_user_path(&grid, &[p(0, 0), p(1, 0)]);
        assert!(unfinished.valid && !unfinished.reached_end);
        assert_eq!(unfinished.efficiency, 0.0);

        assert!(!evaluate_user_path(&grid, &[]).valid);
    }

    #[test]
    fn test_path_marking_keeps_endpoints() {
        let grid = MazeGrid::open(2).unwrap();
        let marked = grid.with_path_marked(&[p(0, 0), p(0, 1), p(1, 1)]);
        assert_eq!(marked.to_string(), "S*\n.E\n");
        assert_eq!(grid.to_string(), "S.\n.E\n");
    }
}
