use crate::grid::{Grid, Position, Role};
use thiserror::Error;

/// Why a search refused to start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("no start cell has been placed")]
    MissingStart,
    #[error("no end cell has been placed")]
    MissingEnd,
    #[error("start and end are the same cell {0}")]
    StartIsEnd(Position),
    #[error("endpoint {0} is not part of the grid")]
    NotInGrid(Position),
    #[error("endpoint {0} is a barrier")]
    BarrierEndpoint(Position),
}

/// A route from start to end, both included.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub cells: Vec<Position>,
    /// Cost-from-start of the end cell; every move costs 1.
    pub cost: u32,
}

impl Path {
    /// Number of moves along the route.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    PathFound(Path),
    NoPathExists,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::PathFound(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::PathFound(path) => Some(path),
            SearchOutcome::NoPathExists => None,
        }
    }
}

/// Check that `start` and `end` can be searched between.
pub fn validate_endpoints(grid: &Grid, start: Position, end: Position) -> Result<(), SearchError> {
    for pos in [start, end] {
        match grid.role(pos) {
            None => return Err(SearchError::NotInGrid(pos)),
            Some(Role::Barrier) => return Err(SearchError::BarrierEndpoint(pos)),
            Some(_) => {}
        }
    }
    if start == end {
        return Err(SearchError::StartIsEnd(start));
    }
    Ok(())
}

/// Start and end as painted on the grid.
pub fn grid_endpoints(grid: &Grid) -> Result<(Position, Position), SearchError> {
    let start = grid.start().ok_or(SearchError::MissingStart)?;
    let end = grid.end().ok_or(SearchError::MissingEnd)?;
    Ok((start, end))
}

pub trait PathfindingAlgorithm {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Finds a route from `start` to `end`, retagging cells on `grid` as it
    /// goes. `on_expand` is called with a read-only view of the grid after
    /// each step the algorithm wants to show.
    fn find_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        on_expand: &mut dyn FnMut(&Grid),
    ) -> Result<SearchOutcome, SearchError>;
}
