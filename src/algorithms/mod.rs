pub mod a_star;
pub mod bfs;
pub mod common;
pub mod heuristic;
pub mod reconstruct;

pub use a_star::{AStar, SearchReport};
pub use bfs::BreadthFirst;
pub use common::{Path, PathfindingAlgorithm, SearchError, SearchOutcome};
