//! Enumeration of the experiment grid.
//!
//! The iteration order is a contract, not an accident of loop nesting:
//! repetitions on the outside, concurrency levels in the middle, update
//! ratios innermost. It determines which experiments run back-to-back and
//! therefore what residual system state each run inherits.

use std::fmt;
use std::time::Duration;

use crate::config::Sweep;

/// One point in the sweep grid.
///
/// Produced by [`Grid::iter`], consumed exactly once by the lifecycle
/// controller, and discarded once its artifacts are archived. The triple
/// `(target_rps, update_percent, repetition)` identifies the experiment and
/// all of its artifact names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experiment {
    /// Number of concurrent load-generator workers.
    pub threads: usize,

    /// Requests-per-second target, always `threads * rate_factor`.
    pub target_rps: u64,

    /// Wall-clock duration of the load run.
    pub duration: Duration,

    /// Percentage of operations that are updates (writes).
    pub update_percent: u8,

    /// Number of pre-loaded items.
    pub load_size: u64,

    /// Bytes per update request.
    pub request_size: u64,

    /// 0-based index distinguishing repeated trials of the same point.
    pub repetition: u32,
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} threads, {}% updates, r{}",
            self.threads, self.update_percent, self.repetition
        )
    }
}

/// The full set of experiments for one sweep.
#[derive(Debug, Clone)]
pub struct Grid {
    sweep: Sweep,
}

impl Grid {
    /// Creates a grid over the configured parameter lists.
    ///
    /// Thread counts must be positive and update percentages must lie in
    /// `0..=100`; guaranteeing that is on the caller.
    pub fn new(sweep: Sweep) -> Self {
        Self { sweep }
    }

    /// Number of experiments this grid enumerates.
    pub fn len(&self) -> usize {
        self.sweep.threads.len()
            * self.sweep.update_percents.len()
            * self.sweep.repetitions as usize
    }

    /// Whether the grid enumerates nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerates all experiments in execution order.
    ///
    /// Repetitions are the outermost loop, then thread counts, then update
    /// percentages. Calling this again restarts the enumeration from the
    /// beginning. No two yielded experiments share an identity triple as
    /// long as the configured lists are themselves free of duplicates.
    pub fn iter(&self) -> impl Iterator<Item = Experiment> + '_ {
        let sweep = &self.sweep;
        (0..sweep.repetitions).flat_map(move |repetition| {
            sweep.threads.iter().flat_map(move |&threads| {
                sweep
                    .update_percents
                    .iter()
                    .map(move |&update_percent| Experiment {
                        threads,
                        target_rps: threads as u64 * sweep.rate_factor,
                        duration: sweep.duration,
                        update_percent,
                        load_size: sweep.load_size,
                        request_size: sweep.request_size,
                        repetition,
                    })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn grid(threads: Vec<usize>, update_percents: Vec<u8>, repetitions: u32) -> Grid {
        Grid::new(Sweep {
            threads,
            update_percents,
            repetitions,
            ..Sweep::default()
        })
    }

    #[test]
    fn enumerates_in_contract_order() {
        let grid = grid(vec![1, 4], vec![0, 100], 1);
        let points: Vec<_> = grid
            .iter()
            .map(|e| (e.threads, e.update_percent, e.repetition, e.target_rps))
            .collect();

        assert_eq!(
            points,
            vec![(1, 0, 0, 10), (1, 100, 0, 10), (4, 0, 0, 40), (4, 100, 0, 40)]
        );
    }

    #[test]
    fn repetitions_are_the_outer_loop() {
        let grid = grid(vec![1, 2], vec![0], 2);
        let order: Vec<_> = grid.iter().map(|e| (e.repetition, e.threads)).collect();
        assert_eq!(order, vec![(0, 1), (0, 2), (1, 1), (1, 2)]);
    }

    #[test]
    fn emits_unique_identity_triples() {
        let grid = grid(vec![1, 4, 8, 12], vec![0, 50, 100], 3);
        assert_eq!(grid.len(), 4 * 3 * 3);

        let triples: HashSet<_> = grid
            .iter()
            .map(|e| (e.target_rps, e.update_percent, e.repetition))
            .collect();
        assert_eq!(triples.len(), grid.len());
    }

    #[test]
    fn target_rate_scales_with_threads() {
        for experiment in grid(vec![1, 4, 8, 28], vec![0], 1).iter() {
            assert_eq!(experiment.target_rps, experiment.threads as u64 * 10);
        }
    }

    #[test]
    fn iteration_is_restartable() {
        let grid = grid(vec![1, 4], vec![0, 100], 2);
        let first: Vec<_> = grid.iter().collect();
        let second: Vec<_> = grid.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_repetitions_is_an_empty_sweep() {
        let grid = grid(vec![1, 4], vec![0, 100], 0);
        assert!(grid.is_empty());
        assert_eq!(grid.iter().count(), 0);
    }
}
