use crate::algorithms::common::{
    grid_endpoints, validate_endpoints, Path, PathfindingAlgorithm, SearchError, SearchOutcome,
};
use crate::algorithms::heuristic::euclidean;
use crate::algorithms::reconstruct::reconstruct_path;
use crate::grid::{Grid, Position, Role};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

/// Open-set entry. Ordered so that `BinaryHeap` pops the lowest `f` first and,
/// among equal `f`, the entry pushed earliest.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    seq: u64,
    pos: Position,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed comparison to make BinaryHeap a min-heap
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Bookkeeping for one search. Built fresh for every call so nothing leaks
/// from one run into the next.
struct SearchState {
    g_score: FxHashMap<Position, u32>,
    f_score: FxHashMap<Position, f64>,
    came_from: FxHashMap<Position, Position>,
    open: BinaryHeap<OpenEntry>,
    // BinaryHeap can't answer "is this cell queued?", so membership is
    // tracked alongside it.
    open_members: FxHashSet<Position>,
    seq: u64,
}

impl SearchState {
    fn new(start: Position, end: Position) -> Self {
        let f = euclidean(start, end);
        let mut state = SearchState {
            g_score: FxHashMap::default(),
            f_score: FxHashMap::default(),
            came_from: FxHashMap::default(),
            open: BinaryHeap::new(),
            open_members: FxHashSet::default(),
            seq: 0,
        };
        state.g_score.insert(start, 0);
        state.f_score.insert(start, f);
        state.open.push(OpenEntry { f, seq: 0, pos: start });
        state.open_members.insert(start);
        state
    }

    /// Missing entries stand for an infinite cost.
    fn g(&self, pos: Position) -> Option<u32> {
        self.g_score.get(&pos).copied()
    }

    fn f(&self, pos: Position) -> f64 {
        self.f_score.get(&pos).copied().unwrap_or(f64::INFINITY)
    }

    fn push(&mut self, pos: Position) {
        let f = self.f(pos);
        self.seq += 1;
        self.open.push(OpenEntry { f, seq: self.seq, pos });
        self.open_members.insert(pos);
    }
}

/// Counters from the most recent search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Cells in the order they were popped from the open set.
    pub expansion_order: Vec<Position>,
    /// Entries pushed onto the open set, the start included.
    pub pushed: usize,
}

impl SearchReport {
    pub fn expanded(&self) -> usize {
        self.expansion_order.len()
    }
}

/// A* over the grid with unit step cost, a Euclidean estimate and FIFO
/// tie-breaking among equal estimates.
#[derive(Debug, Default)]
pub struct AStar {
    last_report: SearchReport,
}

impl AStar {
    pub fn new() -> Self {
        AStar::default()
    }

    pub fn last_report(&self) -> &SearchReport {
        &self.last_report
    }

    /// Searches between the start and end painted on the grid.
    pub fn find_route<F>(
        &mut self,
        grid: &mut Grid,
        on_expand: F,
    ) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(&Grid),
    {
        let (start, end) = grid_endpoints(grid)?;
        self.search(grid, start, end, on_expand)
    }

    /// Runs A* from `start` to `end`.
    ///
    /// Neighbor lists are rebuilt for the whole grid first, so barrier edits
    /// made before the call are honoured. While running, newly queued cells
    /// are tagged [`Role::Open`] and expanded cells [`Role::Closed`]; on
    /// success the route between the endpoints is tagged [`Role::Path`]. The
    /// start and end keep their roles.
    ///
    /// `on_expand` is called once after every expansion and once per step of
    /// path reconstruction. The search waits for it to return.
    pub fn search<F>(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        mut on_expand: F,
    ) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(&Grid),
    {
        validate_endpoints(grid, start, end)?;
        grid.update_neighbors();

        debug!(%start, %end, size = grid.size(), "starting A* search");

        let mut state = SearchState::new(start, end);
        let mut report = SearchReport {
            expansion_order: Vec::new(),
            pushed: 1,
        };
        let mut neighbors: Vec<Position> = Vec::with_capacity(8);

        while let Some(OpenEntry { pos: current, .. }) = state.open.pop() {
            state.open_members.remove(&current);
            report.expansion_order.push(current);

            if current == end {
                let cells = reconstruct_path(&state.came_from, start, end, grid, &mut on_expand);
                let cost = state.g(end).unwrap_or_default();
                debug!(
                    expanded = report.expanded(),
                    pushed = report.pushed,
                    cost,
                    "path found"
                );
                self.last_report = report;
                return Ok(SearchOutcome::PathFound(Path { cells, cost }));
            }

            // Cells only enter the heap after their g-score is recorded.
            let current_g = state.g_score[&current];

            neighbors.clear();
            if let Some(cell) = grid.cell(current) {
                neighbors.extend_from_slice(cell.neighbors());
            }

            for &neighbor in &neighbors {
                let tentative_g = current_g + 1;
                if state.g(neighbor).is_some_and(|g| tentative_g >= g) {
                    continue;
                }

                let f = f64::from(tentative_g) + euclidean(neighbor, end);
                state.came_from.insert(neighbor, current);
                state.g_score.insert(neighbor, tentative_g);
                state.f_score.insert(neighbor, f);

                if !state.open_members.contains(&neighbor) {
                    state.push(neighbor);
                    report.pushed += 1;
                    if neighbor != end {
                        grid.mark(neighbor, Role::Open);
                    }
                }
            }

            on_expand(grid);

            if current != start {
                grid.mark(current, Role::Closed);
            }
        }

        debug!(
            expanded = report.expanded(),
            pushed = report.pushed,
            "open set exhausted, no path"
        );
        self.last_report = report;
        Ok(SearchOutcome::NoPathExists)
    }
}

impl PathfindingAlgorithm for AStar {
    fn name(&self) -> &'static str {
        "a_star"
    }

    fn find_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        on_expand: &mut dyn FnMut(&Grid),
    ) -> Result<SearchOutcome, SearchError> {
        self.search(grid, start, end, on_expand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn grid_with(size: usize, start: Position, end: Position, barriers: &[Position]) -> Grid {
        let mut grid = Grid::new(size).unwrap();
        grid.set_start(start).unwrap();
        grid.set_end(end).unwrap();
        for &b in barriers {
            grid.set_barrier(b).unwrap();
        }
        grid
    }

    #[test]
    fn open_entries_pop_lowest_f_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry { f: 2.0, seq: 0, pos: p(0, 0) });
        heap.push(OpenEntry { f: 1.5, seq: 2, pos: p(0, 1) });
        heap.push(OpenEntry { f: 1.5, seq: 1, pos: p(0, 2) });
        heap.push(OpenEntry { f: 3.0, seq: 3, pos: p(0, 3) });

        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|e| e.pos).collect();
        assert_eq!(order, vec![p(0, 2), p(0, 1), p(0, 0), p(0, 3)]);
    }

    #[test]
    fn adjacent_endpoints_finish_on_first_expansion() {
        let mut grid = grid_with(5, p(2, 2), p(3, 3), &[]);
        let mut astar = AStar::new();
        let mut hook_calls = 0;
        let outcome = astar.find_route(&mut grid, |_| hook_calls += 1).unwrap();

        let path = outcome.path().unwrap();
        assert_eq!(path.cells, vec![p(2, 2), p(3, 3)]);
        assert_eq!(path.steps(), 1);
        assert_eq!(path.cost, 1);
        assert_eq!(astar.last_report().expansion_order, vec![p(2, 2), p(3, 3)]);
        // one expansion plus one reconstruction step
        assert_eq!(hook_calls, 2);
        assert_eq!(grid.role(p(3, 3)), Some(Role::End));
        assert_eq!(grid.role(p(2, 2)), Some(Role::Start));
    }

    #[test]
    fn straight_corridor_expands_along_the_line() {
        let mut grid = grid_with(5, p(0, 0), p(0, 4), &[]);
        let mut astar = AStar::new();
        let outcome = astar.find_route(&mut grid, |_| {}).unwrap();

        let expected: Vec<_> = (0..5).map(|c| p(0, c)).collect();
        assert_eq!(outcome.path().unwrap().cells, expected);
        assert_eq!(astar.last_report().expansion_order, expected);
        assert_eq!(grid.count_role(Role::Path), 3);
        assert_eq!(grid.count_role(Role::Closed), 0);
    }

    #[test]
    fn routes_through_gap_in_wall() {
        let wall: Vec<_> = (0..4).map(|r| p(r, 2)).collect();
        let mut grid = grid_with(5, p(0, 0), p(0, 4), &wall);
        let outcome = AStar::new().find_route(&mut grid, |_| {}).unwrap();

        let path = outcome.path().unwrap();
        assert!(path.cells.contains(&p(4, 2)));
        assert_eq!(path.steps(), 10);
        assert_eq!(path.cost, 10);
        assert_eq!(grid.role(p(4, 2)), Some(Role::Path));
    }

    #[test]
    fn enclosed_end_reports_no_path() {
        let ring = [
            p(1, 1),
            p(1, 2),
            p(1, 3),
            p(2, 1),
            p(2, 3),
            p(3, 1),
            p(3, 2),
            p(3, 3),
        ];
        let mut grid = grid_with(6, p(0, 0), p(2, 2), &ring);
        let mut astar = AStar::new();
        let mut frames = 0;
        let outcome = astar.find_route(&mut grid, |_| frames += 1).unwrap();

        assert_eq!(outcome, SearchOutcome::NoPathExists);
        assert_eq!(frames, astar.last_report().expanded());
        // every free cell outside the ring gets expanded
        assert_eq!(astar.last_report().expanded(), 36 - 8 - 1);
        assert_eq!(grid.count_role(Role::Path), 0);
        assert_eq!(grid.count_role(Role::Closed), 36 - 8 - 2);
        assert_eq!(grid.role(p(2, 2)), Some(Role::End));
    }

    #[test]
    fn never_cuts_between_touching_barriers() {
        let mut grid = grid_with(2, p(0, 0), p(1, 1), &[p(0, 1), p(1, 0)]);
        let outcome = AStar::new().find_route(&mut grid, |_| {}).unwrap();
        assert_eq!(outcome, SearchOutcome::NoPathExists);

        let mut grid = grid_with(4, p(2, 1), p(1, 2), &[p(1, 1), p(2, 2)]);
        let outcome = AStar::new().find_route(&mut grid, |_| {}).unwrap();
        let path = outcome.path().unwrap();
        assert!(path.steps() > 1);
        assert!(path
            .cells
            .windows(2)
            .all(|w| !(w[0] == p(2, 1) && w[1] == p(1, 2))));
    }

    #[test]
    fn rejects_bad_endpoints() {
        let mut grid = grid_with(3, p(0, 0), p(2, 2), &[p(1, 1)]);
        let mut astar = AStar::new();
        assert_eq!(
            astar.search(&mut grid, p(0, 0), p(0, 0), |_| {}),
            Err(SearchError::StartIsEnd(p(0, 0)))
        );
        assert_eq!(
            astar.search(&mut grid, p(0, 0), p(1, 1), |_| {}),
            Err(SearchError::BarrierEndpoint(p(1, 1)))
        );
        assert_eq!(
            astar.search(&mut grid, p(0, 0), p(3, 0), |_| {}),
            Err(SearchError::NotInGrid(p(3, 0)))
        );

        let mut empty = Grid::new(3).unwrap();
        assert_eq!(
            astar.find_route(&mut empty, |_| {}),
            Err(SearchError::MissingStart)
        );
        empty.set_start(p(0, 0)).unwrap();
        assert_eq!(
            astar.find_route(&mut empty, |_| {}),
            Err(SearchError::MissingEnd)
        );
    }

    #[test]
    fn repeated_searches_are_identical() {
        let barriers = [p(1, 2), p(2, 2), p(3, 2), p(3, 3), p(5, 1), p(4, 5)];
        let base = grid_with(7, p(0, 0), p(6, 6), &barriers);

        let mut first_grid = base.clone();
        let mut first = AStar::new();
        let first_outcome = first.find_route(&mut first_grid, |_| {}).unwrap();

        let mut second_grid = base.clone();
        let mut second = AStar::new();
        let second_outcome = second.find_route(&mut second_grid, |_| {}).unwrap();

        assert_eq!(first_outcome, second_outcome);
        assert_eq!(first.last_report(), second.last_report());

        // a reused engine starts from scratch
        let mut again = base.clone();
        let third_outcome = first.find_route(&mut again, |_| {}).unwrap();
        assert_eq!(third_outcome, second_outcome);
        assert_eq!(first.last_report(), second.last_report());
    }

    #[test]
    fn hook_sees_frontier_grow() {
        let mut grid = grid_with(6, p(0, 0), p(5, 5), &[]);
        let mut open_counts = Vec::new();
        AStar::new()
            .find_route(&mut grid, |g| open_counts.push(g.count_role(Role::Open)))
            .unwrap();
        assert!(!open_counts.is_empty());
        // start's neighbors are queued before the first callback
        assert_eq!(open_counts[0], 3);
    }
}
