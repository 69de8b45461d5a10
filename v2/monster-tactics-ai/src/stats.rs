//! Search statistics tracking.

use std::time::Instant;

use monster_tactics_core::Outcome;

/// Counters collected during alpha-beta and Monte Carlo search.
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Alpha-beta nodes visited, leaves included
    pub nodes: u64,

    /// Nodes scored by the static evaluation (depth exhausted)
    pub leaves: u64,

    /// Nodes where a King had already fallen
    pub terminals: u64,

    /// Sibling loops cut short by alpha >= beta
    pub cutoffs: u64,

    /// Deepest ply reached below a root candidate
    pub max_depth: u64,

    /// Monte Carlo playouts run
    pub rollouts: u64,

    /// Playouts the searching team won
    pub rollout_wins: u64,

    /// Playouts abandoned at the ply cap
    pub rollout_cutoffs: u64,

    /// For rate calculation
    start_time: Option<Instant>,
    last_log_time: Option<Instant>,
    last_log_nodes: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record_leaf(&mut self) {
        self.leaves += 1;
    }

    pub fn record_terminal(&mut self) {
        self.terminals += 1;
    }

    pub fn record_depth(&mut self, ply: u64) {
        self.max_depth = self.max_depth.max(ply);
    }

    /// Record one finished playout; `None` means it hit the ply cap.
    pub fn record_rollout(&mut self, outcome: Option<Outcome>, won: bool) {
        self.rollouts += 1;
        if outcome.is_none() {
            self.rollout_cutoffs += 1;
        }
        if won {
            self.rollout_wins += 1;
        }
    }

    /// Nodes plus playouts per second since `new`
    pub fn nodes_per_sec(&self) -> f64 {
        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                return (self.nodes + self.rollouts) as f64 / elapsed;
            }
        }
        0.0
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        if let Some(last) = self.last_log_time {
            last.elapsed().as_secs() >= interval_secs
        } else {
            true
        }
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self) {
        let now = Instant::now();

        let rate = if let Some(last) = self.last_log_time {
            let elapsed = last.elapsed().as_secs_f64();
            let nodes = self.nodes - self.last_log_nodes;
            if elapsed > 0.0 {
                nodes as f64 / elapsed
            } else {
                0.0
            }
        } else {
            self.nodes_per_sec()
        };

        tracing::debug!(
            nodes = self.nodes,
            leaves = self.leaves,
            cutoffs = self.cutoffs,
            depth = self.max_depth,
            rollouts = self.rollouts,
            per_sec = rate.round() as u64,
            pruned_pct = self.pruning_pct(),
            "search progress"
        );

        self.last_log_time = Some(now);
        self.last_log_nodes = self.nodes;
    }

    /// Share of explored branches that were cut.
    pub fn pruning_pct(&self) -> f64 {
        if self.nodes > 0 {
            100.0 * self.cutoffs as f64 / (self.nodes + self.cutoffs) as f64
        } else {
            0.0
        }
    }

    /// Fraction of playouts won, 0 when none ran.
    pub fn rollout_win_rate(&self) -> f64 {
        if self.rollouts == 0 {
            0.0
        } else {
            self.rollout_wins as f64 / self.rollouts as f64
        }
    }

    /// Final summary at `info`
    pub fn log_summary(&self) {
        let elapsed = self
            .start_time
            .map(|s| s.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        tracing::info!(
            nodes = self.nodes,
            leaves = self.leaves,
            terminals = self.terminals,
            cutoffs = self.cutoffs,
            max_depth = self.max_depth,
            rollouts = self.rollouts,
            rollout_wins = self.rollout_wins,
            rollout_cutoffs = self.rollout_cutoffs,
            elapsed_secs = elapsed,
            per_sec = self.nodes_per_sec().round() as u64,
            "search summary"
        );
    }
}
