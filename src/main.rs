use clap::Parser;

use grid_pathfinder::batch_simulation::BatchSimulation;
use grid_pathfinder::config::Config;
use grid_pathfinder::session::Session;
use std::io;

fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .init();

    if !config.quiet {
        println!("Starting A* pathfinder...");
        println!("Grid size: {}x{}", config.grid_size(), config.grid_size());
        println!("Random barriers: {}", config.num_walls);
        if config.visualize() {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
        } else {
            println!("Visualization disabled - running in fast mode");
        }
        println!();
    }

    if config.batch_mode {
        let mut batch = BatchSimulation::new(config.clone());
        match batch.run() {
            Ok(()) => {
                if !config.quiet {
                    batch.print_summary();
                }
            }
            Err(e) => {
                eprintln!("Batch simulation failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut session = match Session::new(&config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Could not create grid: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = session.run_interactive(io::stdin().lock()) {
        eprintln!("Failed to read commands: {}", e);
        std::process::exit(1);
    }
}
