use crate::grid::{Grid, Position, Role};
use rustc_hash::FxHashMap;

/// Walks `came_from` back from `end` until it reaches a cell with no
/// predecessor (the start). Every cell strictly between the two is tagged
/// [`Role::Path`], and `on_step` runs once per step of the walk.
///
/// Returns the route ordered from start to end, both included.
pub fn reconstruct_path(
    came_from: &FxHashMap<Position, Position>,
    start: Position,
    end: Position,
    grid: &mut Grid,
    on_step: &mut dyn FnMut(&Grid),
) -> Vec<Position> {
    let mut route = vec![end];
    let mut current = end;

    while let Some(&previous) = came_from.get(&current) {
        current = previous;
        if current != start {
            grid.mark(current, Role::Path);
        }
        route.push(current);
        on_step(grid);
    }

    route.reverse();
    route
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_only_the_middle() {
        let mut grid = Grid::new(4).unwrap();
        let start = Position::new(0, 0);
        let end = Position::new(3, 3);
        grid.set_start(start).unwrap();
        grid.set_end(end).unwrap();

        let mut came_from = FxHashMap::default();
        came_from.insert(Position::new(1, 1), start);
        came_from.insert(Position::new(2, 2), Position::new(1, 1));
        came_from.insert(end, Position::new(2, 2));

        let mut steps = 0;
        let route = reconstruct_path(&came_from, start, end, &mut grid, &mut |_| steps += 1);

        assert_eq!(
            route,
            vec![start, Position::new(1, 1), Position::new(2, 2), end]
        );
        assert_eq!(steps, 3);
        assert_eq!(grid.count_role(Role::Path), 2);
        assert_eq!(grid.role(start), Some(Role::Start));
        assert_eq!(grid.role(end), Some(Role::End));
    }

    #[test]
    fn adjacent_endpoints_have_no_path_cells() {
        let mut grid = Grid::new(2).unwrap();
        let start = Position::new(0, 0);
        let end = Position::new(1, 1);
        let mut came_from = FxHashMap::default();
        came_from.insert(end, start);

        let route = reconstruct_path(&came_from, start, end, &mut grid, &mut |_| {});
        assert_eq!(route, vec![start, end]);
        assert_eq!(grid.count_role(Role::Path), 0);
    }
}
