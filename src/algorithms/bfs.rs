use crate::algorithms::common::{
    validate_endpoints, Path, PathfindingAlgorithm, SearchError, SearchOutcome,
};
use crate::grid::{Grid, Position, Role};
use pathfinding::prelude::bfs;

/// Breadth-first search over the same eight-way, no-corner-cutting moves as
/// A*. With every step costing 1 this gives the fewest-moves route, which is
/// what A* results are measured against.
#[derive(Debug, Default)]
pub struct BreadthFirst;

impl BreadthFirst {
    pub fn new() -> Self {
        BreadthFirst
    }

    /// Fewest moves between two cells, or `None` if they are not connected.
    pub fn shortest_steps(grid: &Grid, start: Position, end: Position) -> Option<usize> {
        bfs(&start, |pos| grid.neighbors(*pos), |pos| *pos == end).map(|route| route.len() - 1)
    }
}

impl PathfindingAlgorithm for BreadthFirst {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn find_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        on_expand: &mut dyn FnMut(&Grid),
    ) -> Result<SearchOutcome, SearchError> {
        validate_endpoints(grid, start, end)?;

        let Some(cells) = bfs(&start, |pos| grid.neighbors(*pos), |pos| *pos == end) else {
            return Ok(SearchOutcome::NoPathExists);
        };

        for &pos in &cells[1..cells.len() - 1] {
            grid.mark(pos, Role::Path);
        }
        on_expand(grid);

        let cost = (cells.len() - 1) as u32;
        Ok(SearchOutcome::PathFound(Path { cells, cost }))
    }
}
