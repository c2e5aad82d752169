use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    pub expanded: usize,
    pub pushed: usize,
    /// Moves on the route A* reported; 0 when no route was found.
    pub path_length: usize,
    /// Fewest possible moves according to the breadth-first baseline.
    pub optimal_path_length: usize,
    pub route_efficiency: f64,
}

impl SearchStats {
    pub fn new(
        expanded: usize,
        pushed: usize,
        path_length: usize,
        optimal_path_length: usize,
    ) -> Self {
        let mut stats = SearchStats {
            expanded,
            pushed,
            path_length,
            optimal_path_length,
            route_efficiency: 0.0,
        };
        stats.calculate_efficiency();
        stats
    }

    pub fn calculate_efficiency(&mut self) {
        if self.path_length > 0 && self.optimal_path_length > 0 {
            self.route_efficiency = self.path_length as f64 / self.optimal_path_length as f64;
        } else {
            self.route_efficiency = 0.0;
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.path_length == self.optimal_path_length
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cells expanded: {}", self.expanded)?;
        writeln!(f, "Cells queued: {}", self.pushed)?;
        writeln!(f, "Path length: {}", self.path_length)?;
        writeln!(f, "Optimal path length (BFS): {}", self.optimal_path_length)?;
        writeln!(f, "Route efficiency: {:.3}", self.route_efficiency)?;

        if self.route_efficiency > 1.0 {
            writeln!(
                f,
                "Note: {} extra move(s) over the fewest possible",
                self.path_length.saturating_sub(self.optimal_path_length)
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimingData {
    pub search_times: Vec<Duration>,
}

impl TimingData {
    pub fn new() -> Self {
        TimingData::default()
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.search_times.push(elapsed);
    }

    pub fn average_search_time(&self) -> Duration {
        if self.search_times.is_empty() {
            Duration::from_nanos(0)
        } else {
            let total: Duration = self.search_times.iter().sum();
            total / self.search_times.len() as u32
        }
    }

    pub fn total_calls(&self) -> usize {
        self.search_times.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_ratio() {
        let stats = SearchStats::new(20, 30, 11, 10);
        assert!((stats.route_efficiency - 1.1).abs() < 1e-9);
        assert!(!stats.is_optimal());
        assert!(stats.to_string().contains("1 extra move(s)"));

        let failed = SearchStats::new(20, 30, 0, 0);
        assert_eq!(failed.route_efficiency, 0.0);
    }

    #[test]
    fn average_time() {
        let mut timing = TimingData::new();
        assert_eq!(timing.average_search_time(), Duration::ZERO);
        timing.record(Duration::from_millis(2));
        timing.record(Duration::from_millis(4));
        assert_eq!(timing.average_search_time(), Duration::from_millis(3));
        assert_eq!(timing.total_calls(), 2);
    }
}
