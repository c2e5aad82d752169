//! Interactive grid pathfinding: paint barriers, a start and an end onto a
//! square grid, then watch an A* search spread across it and trace the route.

pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod grid;
pub mod render;
pub mod session;
pub mod statistics;
