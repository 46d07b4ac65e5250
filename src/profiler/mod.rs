pub mod report;

use crate::classify::LoopClassification;

/// Execution statistics for one classified innermost loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopStats {
    pub open: usize,
    pub close: usize,
    pub simple: bool,
    pub body: String,
    /// Times the loop body started executing: once on entry through the
    /// `[`, once more for every back-jump through the `]`.
    pub entries: u64,
}

/// Counters the profiling interpreter fills in as it runs: one execution
/// count per token, one entry count per classified innermost loop.
///
/// Owned by the one execution that populates it, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ExecutionProfile {
    counts: Vec<u64>,
    loops: Vec<LoopStats>,
    /// Token position (either bracket of an innermost loop) -> index into
    /// `loops`, so the engine resolves a bracket in one array load.
    loop_at: Vec<Option<usize>>,
}

impl ExecutionProfile {
    pub fn new(token_count: usize, classifications: Vec<LoopClassification>) -> ExecutionProfile {
        let loops: Vec<LoopStats> = classifications
            .into_iter()
            .map(|c| LoopStats {
                open: c.open,
                close: c.close,
                simple: c.simple,
                body: c.body,
                entries: 0,
            })
            .collect();

        let mut loop_at = vec![None; token_count];
        for (index, stats) in loops.iter().enumerate() {
            loop_at[stats.open] = Some(index);
            loop_at[stats.close] = Some(index);
        }

        ExecutionProfile {
            counts: vec![0; token_count],
            loops,
            loop_at,
        }
    }

    /// One more execution of the token at `position`.
    pub fn record_execution(&mut self, position: usize) {
        self.counts[position] += 1;
    }

    /// One more body entry for the loop owning the bracket at `position`.
    /// A no-op for brackets of loops that aren't innermost.
    pub fn record_entry(&mut self, position: usize) {
        if let Some(index) = self.loop_at[position] {
            self.loops[index].entries += 1;
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn loops(&self) -> &[LoopStats] {
        &self.loops
    }
}
