use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Offset by a signed delta; `None` if it would go below zero.
    fn offset(self, d_row: isize, d_col: isize) -> Option<Position> {
        Some(Position {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What a cell currently is. Exactly one role holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Free,
    Barrier,
    Start,
    End,
    Open,
    Closed,
    Path,
}

impl Role {
    /// Roles the search paints while it runs.
    pub fn is_search_mark(self) -> bool {
        matches!(self, Role::Open | Role::Closed | Role::Path)
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    position: Position,
    role: Role,
    neighbors: Vec<Position>,
}

impl Cell {
    fn new(position: Position) -> Self {
        Cell {
            position,
            role: Role::Free,
            neighbors: Vec::with_capacity(8),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_barrier(&self) -> bool {
        self.role == Role::Barrier
    }

    /// Neighbor list cached by the last [`Grid::update_neighbors`] call.
    pub fn neighbors(&self) -> &[Position] {
        &self.neighbors
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for Cell {}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size {0} is too small, need at least 2x2")]
    TooSmall(usize),
    #[error("{pos} is outside the {size}x{size} grid")]
    OutOfBounds { pos: Position, size: usize },
    #[error("{pos} is already the {role:?} cell")]
    Occupied { pos: Position, role: Role },
}

/// Step order used for neighbor lists: down, up, right, left, then the
/// diagonals down-right, down-left, up-right, up-left.
const ORTHOGONAL: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
    start: Option<Position>,
    end: Option<Position>,
}

impl Grid {
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size < 2 {
            return Err(GridError::TooSmall(size));
        }
        let cells = (0..size)
            .map(|row| (0..size).map(|col| Cell::new(Position::new(row, col))).collect())
            .collect();

        Ok(Grid {
            size,
            cells,
            start: None,
            end: None,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn end(&self) -> Option<Position> {
        self.end
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(pos.row)?.get(pos.col)
    }

    pub fn role(&self, pos: Position) -> Option<Role> {
        self.cell(pos).map(|cell| cell.role)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.cells().filter(|cell| cell.role == role).count()
    }

    fn checked(&self, pos: Position) -> Result<(), GridError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                pos,
                size: self.size,
            })
        }
    }

    /// Retag a cell. Callers guarantee `pos` is in range.
    pub(crate) fn mark(&mut self, pos: Position, role: Role) {
        self.cells[pos.row][pos.col].role = role;
    }

    fn forget_endpoint(&mut self, pos: Position) {
        if self.start == Some(pos) {
            self.start = None;
        }
        if self.end == Some(pos) {
            self.end = None;
        }
    }

    pub fn set_start(&mut self, pos: Position) -> Result<(), GridError> {
        self.checked(pos)?;
        if self.end == Some(pos) {
            return Err(GridError::Occupied { pos, role: Role::End });
        }
        if let Some(previous) = self.start.take() {
            self.mark(previous, Role::Free);
        }
        self.mark(pos, Role::Start);
        self.start = Some(pos);
        Ok(())
    }

    pub fn set_end(&mut self, pos: Position) -> Result<(), GridError> {
        self.checked(pos)?;
        if self.start == Some(pos) {
            return Err(GridError::Occupied { pos, role: Role::Start });
        }
        if let Some(previous) = self.end.take() {
            self.mark(previous, Role::Free);
        }
        self.mark(pos, Role::End);
        self.end = Some(pos);
        Ok(())
    }

    pub fn set_barrier(&mut self, pos: Position) -> Result<(), GridError> {
        self.checked(pos)?;
        match self.cells[pos.row][pos.col].role {
            role @ (Role::Start | Role::End) => Err(GridError::Occupied { pos, role }),
            _ => {
                self.mark(pos, Role::Barrier);
                Ok(())
            }
        }
    }

    pub fn reset_cell(&mut self, pos: Position) -> Result<(), GridError> {
        self.checked(pos)?;
        self.forget_endpoint(pos);
        self.mark(pos, Role::Free);
        Ok(())
    }

    /// Left-click behaviour: the first paint places the start, the next the
    /// end, and every later one a barrier. Start and end are never painted over.
    pub fn paint(&mut self, pos: Position) -> Result<Role, GridError> {
        self.checked(pos)?;
        if self.start == Some(pos) || self.end == Some(pos) {
            return Ok(self.cells[pos.row][pos.col].role);
        }
        if self.start.is_none() {
            self.set_start(pos)?;
            Ok(Role::Start)
        } else if self.end.is_none() {
            self.set_end(pos)?;
            Ok(Role::End)
        } else {
            self.set_barrier(pos)?;
            Ok(Role::Barrier)
        }
    }

    /// Right-click behaviour, same as [`Grid::reset_cell`].
    pub fn erase(&mut self, pos: Position) -> Result<(), GridError> {
        self.reset_cell(pos)
    }

    /// Turn Open, Closed and Path cells back into Free ones.
    pub fn clear_search_marks(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if cell.role.is_search_mark() {
                cell.role = Role::Free;
            }
        }
    }

    fn is_free_at(&self, pos: Option<Position>) -> bool {
        pos.and_then(|p| self.cell(p)).is_some_and(|cell| !cell.is_barrier())
    }

    /// Cells reachable from `pos` in one step. A diagonal step is allowed only
    /// when both orthogonal cells beside it are open, so paths never squeeze
    /// between two barriers that meet at a corner.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);

        for &(dr, dc) in &ORTHOGONAL {
            let next = pos.offset(dr, dc);
            if self.is_free_at(next) {
                neighbors.extend(next);
            }
        }

        for &(dr, dc) in &DIAGONAL {
            let next = pos.offset(dr, dc);
            if self.is_free_at(next)
                && self.is_free_at(pos.offset(dr, 0))
                && self.is_free_at(pos.offset(0, dc))
            {
                neighbors.extend(next);
            }
        }
        neighbors
    }

    /// Recompute and cache every cell's neighbor list.
    pub fn update_neighbors(&mut self) {
        for row in 0..self.size {
            for col in 0..self.size {
                let neighbors = self.neighbors(Position::new(row, col));
                self.cells[row][col].neighbors = neighbors;
            }
        }
    }

    /// Place up to `count` barriers on distinct random free cells and return
    /// how many were placed. Asking for more than the grid has room for
    /// fills every free cell.
    pub fn scatter_barriers<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let mut free: Vec<Position> = self
            .cells()
            .filter(|cell| cell.role == Role::Free)
            .map(Cell::position)
            .collect();
        let count = count.min(free.len());
        let (chosen, _) = free.partial_shuffle(rng, count);
        for &pos in chosen.iter() {
            self.mark(pos, Role::Barrier);
        }
        count
    }
}
