use crate::algorithms::common::grid_endpoints;
use crate::algorithms::{AStar, BreadthFirst, SearchError, SearchOutcome};
use crate::config::Config;
use crate::grid::{Grid, GridError, Position};
use crate::render::{render, FramePrinter, LEGEND};
use crate::statistics::{SearchStats, TimingData};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead};
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

pub const HELP: &str = "\
Commands (rows and columns start at 0):
  paint R C   first paint sets the start, then the end, then barriers
  erase R C   reset a cell, forgetting the start or end if it was one
  start R C   move the start here
  end R C     move the end here
  wall R C    make a barrier
  reset R C   make the cell free again
  walls N     scatter N random barriers
  run         search from start to end
  clear       throw the grid away and start over
  show        print the grid
  help        this text
  quit        leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Paint(Position),
    Erase(Position),
    Start(Position),
    End(Position),
    Wall(Position),
    Reset(Position),
    Walls(usize),
    Run,
    Clear,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    WrongArguments {
        command: String,
        expected: &'static str,
    },
    #[error("`{0}` is not a non-negative number")]
    BadNumber(String),
}

fn parse_number(word: &str) -> Result<usize, CommandError> {
    word.parse()
        .map_err(|_| CommandError::BadNumber(word.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let wrong = |expected| CommandError::WrongArguments {
            command: name.clone(),
            expected,
        };
        let position = |args: &[&str]| -> Result<Position, CommandError> {
            match args {
                [row, col] => Ok(Position::new(parse_number(row)?, parse_number(col)?)),
                _ => Err(wrong("a row and a column")),
            }
        };
        let bare = |command| {
            if args.is_empty() {
                Ok(command)
            } else {
                Err(wrong("no arguments"))
            }
        };

        match name.as_str() {
            "paint" | "p" => position(args.as_slice()).map(Command::Paint),
            "erase" | "e" => position(args.as_slice()).map(Command::Erase),
            "start" => position(args.as_slice()).map(Command::Start),
            "end" => position(args.as_slice()).map(Command::End),
            "wall" | "w" => position(args.as_slice()).map(Command::Wall),
            "reset" => position(args.as_slice()).map(Command::Reset),
            "walls" => match args.as_slice() {
                [count] => Ok(Command::Walls(parse_number(count)?)),
                _ => Err(wrong("a barrier count")),
            },
            "run" | "r" => bare(Command::Run),
            "clear" | "c" => bare(Command::Clear),
            "show" | "s" => bare(Command::Show),
            "help" | "h" | "?" => bare(Command::Help),
            "quit" | "q" | "exit" => bare(Command::Quit),
            _ => Err(CommandError::Unknown(name.clone())),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("cannot search: {0}")]
    Search(#[from] SearchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One editing session: a grid, the edits applied to it and the searches run
/// over it.
pub struct Session {
    grid_size: usize,
    grid: Grid,
    astar: AStar,
    printer: FramePrinter,
    rng: StdRng,
    quiet: bool,
    last_stats: Option<SearchStats>,
    timing: TimingData,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, GridError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Session {
            grid_size: config.grid_size(),
            grid: Grid::new(config.grid_size())?,
            astar: AStar::new(),
            printer: FramePrinter::new(config.delay_ms, config.visualize()),
            rng,
            quiet: config.quiet,
            last_stats: None,
            timing: TimingData::new(),
        };
        if config.num_walls > 0 {
            let placed = session.grid.scatter_barriers(config.num_walls, &mut session.rng);
            info!(placed, requested = config.num_walls, "scattered barriers");
        }
        Ok(session)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }

    pub fn timing(&self) -> &TimingData {
        &self.timing
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow, SessionError> {
        match command {
            Command::Paint(pos) => {
                self.grid.paint(pos)?;
            }
            Command::Erase(pos) => self.grid.erase(pos)?,
            Command::Start(pos) => self.grid.set_start(pos)?,
            Command::End(pos) => self.grid.set_end(pos)?,
            Command::Wall(pos) => self.grid.set_barrier(pos)?,
            Command::Reset(pos) => self.grid.reset_cell(pos)?,
            Command::Walls(count) => {
                let placed = self.grid.scatter_barriers(count, &mut self.rng);
                info!(placed, requested = count, "scattered barriers");
            }
            Command::Run => {
                self.run_search()?;
                return Ok(Flow::Continue);
            }
            Command::Clear => {
                self.grid = Grid::new(self.grid_size)?;
                self.last_stats = None;
                info!(size = self.grid_size, "grid cleared");
            }
            Command::Show => {
                println!("{}", LEGEND);
                print!("{}", render(&self.grid));
                return Ok(Flow::Continue);
            }
            Command::Help => {
                println!("{}", HELP);
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        self.printer.draw(&self.grid, "editing");
        Ok(Flow::Continue)
    }

    /// Searches between the painted start and end. Marks left by an earlier
    /// search are cleared first; marks from this one stay on the grid
    /// whether or not a route was found.
    pub fn run_search(&mut self) -> Result<bool, SessionError> {
        let (start, end) = grid_endpoints(&self.grid)?;
        self.grid.clear_search_marks();

        let printer = &mut self.printer;
        let mut step = 0usize;
        let started = Instant::now();
        let outcome = self.astar.search(&mut self.grid, start, end, |grid| {
            step += 1;
            let status = format!("Searching {} -> {} | Step: {}", start, end, step);
            printer.draw(grid, &status);
        })?;
        let elapsed = started.elapsed();
        self.timing.record(elapsed);

        let report = self.astar.last_report();
        let path_length = outcome.path().map_or(0, |path| path.steps());
        let optimal = BreadthFirst::shortest_steps(&self.grid, start, end).unwrap_or(0);
        let stats = SearchStats::new(report.expanded(), report.pushed, path_length, optimal);

        let found = outcome.is_found();
        match &outcome {
            SearchOutcome::PathFound(path) => {
                info!(
                    %start,
                    %end,
                    steps = path.steps(),
                    expanded = stats.expanded,
                    ?elapsed,
                    "path found"
                );
                self.printer.draw(&self.grid, &format!("Path found: {} moves", path.steps()));
            }
            SearchOutcome::NoPathExists => {
                info!(%start, %end, expanded = stats.expanded, ?elapsed, "no path exists");
                self.printer.draw(&self.grid, "No path exists");
            }
        }

        if !self.quiet {
            println!("=== SEARCH COMPLETE ===");
            println!("{}", if found { "SUCCESS: path found" } else { "FAILED: no path exists" });
            print!("{}", stats);
            println!("Search time: {:.2?}", elapsed);
        }

        self.last_stats = Some(stats);
        Ok(found)
    }

    /// Reads commands line by line until `quit` or end of input. Lines that
    /// fail to parse or apply are reported and skipped.
    pub fn run_interactive<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        if !self.quiet {
            println!("{}", HELP);
        }
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            let result = line
                .parse::<Command>()
                .map_err(SessionError::from)
                .and_then(|command| self.execute(command));

            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    warn!(%line, error = %e, "command rejected");
                    println!("error: {}", e);
                }
            }
        }
        info!(searches = self.timing.total_calls(), "session finished");
        Ok(())
    }
}
