use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Paint a grid and watch A* find its way across it",
    long_about = None
)]
pub struct Config {
    /// Cells per side; the grid is square.
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u16).range(2..=512))]
    pub grid_size: u16,

    /// Random barriers placed on a fresh grid.
    #[arg(long, default_value_t = 0)]
    pub num_walls: usize,

    /// Seed for barrier placement; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause after each drawn frame.
    #[arg(long, default_value_t = 20)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    /// Run random searches and print a summary instead of reading commands.
    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 100)]
    pub num_simulations: usize,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Diagnostic log level written to stderr (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    pub log_level: tracing::Level,
}

impl Config {
    pub fn grid_size(&self) -> usize {
        usize::from(self.grid_size)
    }

    pub fn visualize(&self) -> bool {
        !self.no_visualization && !self.batch_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["grid_pathfinder"]);
        assert_eq!(config.grid_size(), 40);
        assert_eq!(config.num_walls, 0);
        assert_eq!(config.log_level, tracing::Level::WARN);
        assert!(config.visualize());
    }

    #[test]
    fn batch_mode_turns_off_frames() {
        let config = Config::parse_from([
            "grid_pathfinder",
            "--batch-mode",
            "--grid-size",
            "12",
            "--seed",
            "9",
            "--log-level",
            "debug",
        ]);
        assert_eq!(config.grid_size(), 12);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert!(!config.visualize());
    }

    #[test]
    fn rejects_one_cell_grid() {
        assert!(Config::try_parse_from(["grid_pathfinder", "--grid-size", "1"]).is_err());
    }
}
