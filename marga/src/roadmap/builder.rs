//! One generation pass: sample, connect, repair.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::RoadmapConfig;
use crate::error::{Result, RoadmapError};
use crate::grid::OccupancyGrid;

use super::budget::GenerationBudget;
use super::connector::Connector;
use super::graph::WaypointGraph;
use super::repair::{RepairState, Repairer};
use super::sampler::Sampler;
use super::store::{ConnectivityStatus, GenerationStats, Roadmap};

/// Builds a [`Roadmap`] from a borrowed grid snapshot.
///
/// # Example
///
/// ```rust,ignore
/// use marga::config::RoadmapConfig;
/// use marga::roadmap::RoadmapBuilder;
///
/// let config = RoadmapConfig::new()
///     .with_neighbors(3)
///     .with_min_spacing(0.4)
///     .with_connection_radius(1.2)
///     .with_seed(42);
/// let roadmap = RoadmapBuilder::new(&grid, config).build()?;
/// println!("{} waypoints, {}", roadmap.len(), roadmap.status());
/// ```
pub struct RoadmapBuilder<'a> {
    grid: &'a OccupancyGrid,
    config: RoadmapConfig,
    budget: GenerationBudget,
}

impl<'a> RoadmapBuilder<'a> {
    /// Create a builder with an unlimited budget.
    pub fn new(grid: &'a OccupancyGrid, config: RoadmapConfig) -> Self {
        Self {
            grid,
            config,
            budget: GenerationBudget::unlimited(),
        }
    }

    /// Use a caller-supplied budget.
    ///
    /// A `timeout_ms` in the configuration is applied on top of it when the
    /// budget has no deadline of its own.
    pub fn with_budget(mut self, budget: GenerationBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Run the pass.
    ///
    /// Fails on invalid parameters or when fewer than two waypoints fit in
    /// free space. Running out of budget is not an error: the roadmap built
    /// so far is returned with [`ConnectivityStatus::TimedOut`].
    pub fn build(self) -> Result<Roadmap> {
        self.config.validate()?;
        let start = Instant::now();

        let mut budget = self.budget;
        if let Some(ms) = self.config.timeout_ms
            && budget.deadline().is_none()
        {
            budget = budget.with_timeout(Duration::from_millis(ms));
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut stats = GenerationStats::default();

        // Sample
        let sampled = Sampler::new(
            self.grid,
            self.config.min_spacing,
            self.config.max_waypoints,
            self.config.max_consecutive_rejections,
        )
        .sample(&mut rng, &budget);
        stats.sampled = sampled.waypoints.len();
        stats.rejected_samples = sampled.rejected;

        let mut graph = WaypointGraph::from_waypoints(sampled.waypoints);
        if sampled.interrupted {
            return Ok(finish(graph, None, stats, start));
        }
        if graph.len() < 2 {
            return Err(RoadmapError::InsufficientFreeSpace {
                sampled: graph.len(),
            });
        }

        // Connect
        let connected = Connector::new(
            self.grid,
            self.config.neighbors,
            self.config.connection_radius,
        )
        .connect(&mut graph, &budget);
        stats.local_edges = connected.added;
        stats.blocked_candidates = connected.blocked;
        if connected.interrupted {
            return Ok(finish(graph, None, stats, start));
        }

        // Repair
        let repaired = Repairer::new(
            self.grid,
            self.config.connection_radius,
            self.config.relaxation_factor,
        )
        .repair(&mut graph, &budget);
        stats.components_before_repair = repaired.initial_components;
        stats.repair_edges = repaired.added;
        stats.max_relaxation_stage = repaired.max_stage;

        Ok(finish(graph, Some(repaired.state), stats, start))
    }
}

/// Settle the terminal status and hand the graph over.
///
/// `state` is `None` when the budget fired before the repair stage.
fn finish(
    graph: WaypointGraph,
    state: Option<RepairState>,
    mut stats: GenerationStats,
    start: Instant,
) -> Roadmap {
    let status = match state {
        Some(RepairState::Connected) => ConnectivityStatus::Connected,
        Some(RepairState::Unconnectable { components }) => {
            ConnectivityStatus::Unconnectable { components }
        }
        _ => ConnectivityStatus::TimedOut {
            components: graph.components().len(),
        },
    };
    stats.elapsed = start.elapsed();

    match status {
        ConnectivityStatus::Connected => info!(
            "[Roadmap] {} waypoints, {} edges ({} repair), connected in {:.1}ms",
            graph.len(),
            graph.edge_count(),
            stats.repair_edges,
            stats.elapsed.as_secs_f64() * 1000.0
        ),
        ConnectivityStatus::Unconnectable { components } => warn!(
            "[Roadmap] {} waypoints, {} edges, {} components remain unconnectable",
            graph.len(),
            graph.edge_count(),
            components
        ),
        ConnectivityStatus::TimedOut { components } => warn!(
            "[Roadmap] Budget exhausted after {:.1}ms: {} waypoints, {} edges, {} components",
            stats.elapsed.as_secs_f64() * 1000.0,
            graph.len(),
            graph.edge_count(),
            components
        ),
    }
    debug!("[Roadmap] {:?}", stats);

    Roadmap::new(graph, status, stats)
}
