//! Terminal view of a grid. Only reads cell roles; nothing here feeds back
//! into the search.

use crate::grid::{Grid, Role};
use std::fmt::Write as _;
use std::thread;
use std::time::Duration;

pub const LEGEND: &str = "Legend: S=Start, E=End, #=Barrier, o=Open, x=Closed, *=Path, .=Free";

pub fn glyph(role: Role) -> char {
    match role {
        Role::Free => '.',
        Role::Barrier => '#',
        Role::Start => 'S',
        Role::End => 'E',
        Role::Open => 'o',
        Role::Closed => 'x',
        Role::Path => '*',
    }
}

/// Grid as text, one line per row, with column and row numbers.
pub fn render(grid: &Grid) -> String {
    let mut out = String::from("   ");
    for col in 0..grid.size() {
        let _ = write!(out, "{:2}", col % 10);
    }
    out.push('\n');

    for (row, cells) in grid.rows().enumerate() {
        let _ = write!(out, "{:2} ", row);
        for cell in cells {
            out.push(glyph(cell.role()));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Draws frames to the terminal, pausing between them so the search can be
/// watched.
#[derive(Debug, Clone)]
pub struct FramePrinter {
    delay: Duration,
    enabled: bool,
    frames: usize,
}

impl FramePrinter {
    pub fn new(delay_ms: u64, enabled: bool) -> Self {
        FramePrinter {
            delay: Duration::from_millis(delay_ms),
            enabled,
            frames: 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Clear the screen and print `status` above the grid.
    pub fn draw(&mut self, grid: &Grid, status: &str) {
        self.frames += 1;
        if !self.enabled {
            return;
        }
        print!("\x1B[2J\x1B[1;1H");
        println!("=== A* PATHFINDER ===");
        println!("{}", status);
        println!("{}", LEGEND);
        print!("{}", render(grid));

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
