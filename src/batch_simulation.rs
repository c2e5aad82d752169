use crate::algorithms::{AStar, BreadthFirst, PathfindingAlgorithm, SearchError};
use crate::config::Config;
use crate::grid::{Grid, GridError, Position};
use crate::statistics::{SearchStats, TimingData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// One algorithm's attempt on a batch grid.
#[derive(Debug, Clone)]
pub struct AlgorithmRun {
    pub name: &'static str,
    /// Moves on the route found, `None` when there was none.
    pub steps: Option<usize>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub simulation_id: usize,
    pub start: Position,
    pub end: Position,
    pub barriers: usize,
    pub success: bool,
    pub stats: SearchStats,
    /// A* first, then the breadth-first baseline.
    pub runs: Vec<AlgorithmRun>,
}

/// Runs A* on many random grids and compares each route with the
/// breadth-first baseline.
pub struct BatchSimulation {
    config: Config,
    rng: StdRng,
    seed: u64,
    results: Vec<BatchResult>,
    timing: TimingData,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        // Use seed for reproducible results
        let seed = config.seed.unwrap_or_else(rand::random);
        BatchSimulation {
            config,
            rng: StdRng::seed_from_u64(seed),
            seed,
            results: Vec::new(),
            timing: TimingData::new(),
        }
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    pub fn run(&mut self) -> Result<(), BatchError> {
        let size = self.config.grid_size();
        if !self.config.quiet {
            println!("=== BATCH SIMULATION STARTED ===");
            println!("Grid size: {}x{}", size, size);
            println!("Barriers per grid: {}", self.config.num_walls);
            println!("Simulations: {}", self.config.num_simulations);
            println!("Seed: {} (for reproducibility)", self.seed);
            println!();
        }
        info!(seed = self.seed, simulations = self.config.num_simulations, "batch started");

        for simulation_id in 0..self.config.num_simulations {
            let result = self.run_one(simulation_id, size)?;
            debug!(
                simulation_id,
                success = result.success,
                expanded = result.stats.expanded,
                "simulation finished"
            );
            self.results.push(result);
        }

        info!(completed = self.results.len(), "batch finished");
        Ok(())
    }

    fn random_position(&mut self, size: usize) -> Position {
        Position::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size))
    }

    fn run_one(&mut self, simulation_id: usize, size: usize) -> Result<BatchResult, BatchError> {
        let mut grid = Grid::new(size)?;
        let start = self.random_position(size);
        let mut end = self.random_position(size);
        while end == start {
            end = self.random_position(size);
        }
        grid.set_start(start)?;
        grid.set_end(end)?;
        let barriers = grid.scatter_barriers(self.config.num_walls, &mut self.rng);

        let mut astar = AStar::new();
        let mut baseline = BreadthFirst::new();
        let algorithms: [&mut dyn PathfindingAlgorithm; 2] = [&mut astar, &mut baseline];
        let mut runs = Vec::with_capacity(algorithms.len());
        for algorithm in algorithms {
            let mut scratch = grid.clone();
            let started = Instant::now();
            let outcome = algorithm.find_path(&mut scratch, start, end, &mut |_| {})?;
            let run = AlgorithmRun {
                name: algorithm.name(),
                steps: outcome.path().map(|path| path.steps()),
                elapsed: started.elapsed(),
            };
            debug!(simulation_id, algorithm = run.name, steps = ?run.steps, "algorithm finished");
            runs.push(run);
        }
        self.timing.record(runs[0].elapsed);

        let report = astar.last_report();
        let path_length = runs[0].steps.unwrap_or(0);
        let optimal = runs[1].steps.unwrap_or(0);
        Ok(BatchResult {
            simulation_id,
            start,
            end,
            barriers,
            success: runs[0].steps.is_some(),
            stats: SearchStats::new(report.expanded(), report.pushed, path_length, optimal),
            runs,
        })
    }

    /// Mean time per search for each algorithm, in run order.
    pub fn average_times(&self) -> Vec<(&'static str, Duration)> {
        let mut totals: Vec<(&'static str, Duration, u32)> = Vec::new();
        for run in self.results.iter().flat_map(|r| &r.runs) {
            match totals.iter_mut().find(|(name, _, _)| *name == run.name) {
                Some((_, total, count)) => {
                    *total += run.elapsed;
                    *count += 1;
                }
                None => totals.push((run.name, run.elapsed, 1)),
            }
        }
        totals
            .into_iter()
            .map(|(name, total, count)| (name, total / count))
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Successful runs whose route was longer than the fewest possible moves.
    pub fn suboptimal_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.success && !r.stats.is_optimal())
            .count()
    }

    pub fn print_summary(&self) {
        let total = self.results.len();
        let successes: Vec<_> = self.results.iter().filter(|r| r.success).collect();

        println!("\n=== BATCH SIMULATION COMPLETED ===");
        println!("Simulations run: {}", total);
        if total == 0 {
            return;
        }

        println!(
            "Path found: {} ({:.1}%)",
            successes.len(),
            successes.len() as f64 / total as f64 * 100.0
        );

        let mean_expanded =
            self.results.iter().map(|r| r.stats.expanded).sum::<usize>() as f64 / total as f64;
        println!("Mean cells expanded: {:.1}", mean_expanded);

        if !successes.is_empty() {
            let mean_efficiency = successes
                .iter()
                .map(|r| r.stats.route_efficiency)
                .sum::<f64>()
                / successes.len() as f64;
            println!("Mean route efficiency: {:.3}", mean_efficiency);
            println!(
                "Longer than optimal: {} of {}",
                self.suboptimal_count(),
                successes.len()
            );
        }
        println!(
            "Average search time: {:.2?}",
            self.timing.average_search_time()
        );
        for (name, average) in self.average_times() {
            println!("  {:<8} {:.2?}", name, average);
        }

        let worst = successes
            .iter()
            .max_by(|a, b| a.stats.route_efficiency.total_cmp(&b.stats.route_efficiency));
        if let Some(worst) = worst.filter(|r| !r.stats.is_optimal()) {
            println!(
                "Worst route: simulation {} from {} to {} ({} moves, optimal {})",
                worst.simulation_id,
                worst.start,
                worst.end,
                worst.stats.path_length,
                worst.stats.optimal_path_length
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn batch_config(walls: &str, runs: &str) -> Config {
        Config::parse_from([
            "grid_pathfinder",
            "--batch-mode",
            "--quiet",
            "--grid-size",
            "12",
            "--num-walls",
            walls,
            "--num-simulations",
            runs,
            "--seed",
            "42",
        ])
    }

    #[test]
    fn empty_grids_always_succeed_optimally() {
        let mut batch = BatchSimulation::new(batch_config("0", "25"));
        batch.run().unwrap();
        assert_eq!(batch.results().len(), 25);
        assert_eq!(batch.success_count(), 25);
        assert_eq!(batch.suboptimal_count(), 0);
    }

    #[test]
    fn success_matches_baseline_reachability() {
        let mut batch = BatchSimulation::new(batch_config("50", "40"));
        batch.run().unwrap();
        for result in batch.results() {
            assert_eq!(result.success, result.stats.optimal_path_length > 0);
            if result.success {
                assert!(result.stats.path_length >= result.stats.optimal_path_length);
            }
        }
    }

    #[test]
    fn same_seed_same_results() {
        let mut first = BatchSimulation::new(batch_config("30", "10"));
        let mut second = BatchSimulation::new(batch_config("30", "10"));
        first.run().unwrap();
        second.run().unwrap();
        let summary = |b: &BatchSimulation| {
            b.results()
                .iter()
                .map(|r| (r.start, r.end, r.barriers, r.stats.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&first), summary(&second));
    }

    #[test]
    fn every_algorithm_reports_by_name() {
        let mut batch = BatchSimulation::new(batch_config("20", "8"));
        batch.run().unwrap();
        for result in batch.results() {
            let names: Vec<_> = result.runs.iter().map(|run| run.name).collect();
            assert_eq!(names, ["a_star", "bfs"]);
            assert_eq!(result.runs[0].steps.is_some(), result.runs[1].steps.is_some());
        }
        let averages = batch.average_times();
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].0, "a_star");
        assert_eq!(averages[1].0, "bfs");
    }
}
