//! The best-first branch-and-bound driver.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use super::error::SearchError;
use super::frontier::Frontier;
use super::problem::BranchAndBound;

/// Tuning knobs for a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Emit a `trace!` heartbeat every this many expansions (0 disables it).
    pub log_interval: u64,
    /// Fail with [`SearchError::ExpansionLimit`] after this many expansions.
    pub expansion_limit: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            log_interval: 10_000,
            expansion_limit: None,
        }
    }
}

/// Snapshot handed to the progress callback after every loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress<V> {
    /// Frontier pops so far, including the current one.
    pub step: u64,
    /// Open nodes left after this iteration.
    pub frontier_len: usize,
    /// Best terminal value seen so far.
    pub incumbent: Option<V>,
}

/// Counters describing how much work a finished search did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose successors were generated.
    pub expanded: u64,
    /// Terminal nodes evaluated as candidates.
    pub terminals: u64,
    /// Largest frontier size observed.
    pub max_frontier: usize,
}

/// Result of a successful search: the optimum and the terminal state that
/// achieved it.
#[derive(Debug, Clone)]
pub struct SearchOutcome<S, V> {
    pub value: V,
    pub state: S,
    pub stats: SearchStats,
}

type ProgressFn<'a, V> = Box<dyn FnMut(&Progress<V>) + 'a>;

/// Placeholder problem type for a builder that has not been given one yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProblem;

/// Best-first branch-and-bound maximizer.
///
/// The frontier is a max-heap keyed by each node's bound. The search
/// repeatedly pops the most promising node:
///
/// 1. a node with budget 0 is a candidate; its objective replaces the
///    incumbent when strictly better;
/// 2. a node with budget left whose bound does not beat the incumbent ends
///    the search, since every node still in the frontier has a bound no
///    higher;
/// 3. any other node is expanded and its successors pushed.
///
/// With an admissible bound the incumbent at the end is optimal.
///
/// # Example
///
/// ```rust
/// use aoc_2022::utils::best_first::{BestFirstSearch, ClosureProblem, SearchConfig};
///
/// let problem = ClosureProblem::new(
///     |held: &u32, budget: u32| vec![(*held, 0), (held + budget, budget - 1)],
///     |held: &u32, budget: u32| held + budget * (budget + 1) / 2,
///     |held: &u32| *held,
/// );
///
/// let mut steps = 0;
/// let mut search = BestFirstSearch::builder()
///     .problem(problem)
///     .config(SearchConfig { log_interval: 0, expansion_limit: Some(1_000) })
///     .on_progress(|_| steps += 1)
///     .build();
///
/// let outcome = search.run(0, 4).unwrap();
/// assert_eq!(outcome.value, 4 + 3 + 2 + 1);
/// drop(search);
/// assert!(steps > 0);
/// ```
pub struct BestFirstSearch<'a, P, V> {
    problem: P,
    config: SearchConfig,
    on_progress: Option<ProgressFn<'a, V>>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a, V> BestFirstSearch<'a, NoProblem, V> {
    /// Starts a builder; a problem must be supplied before `build`.
    pub fn builder() -> SearchBuilder<'a, NoProblem, V> {
        SearchBuilder {
            problem: NoProblem,
            config: SearchConfig::default(),
            on_progress: None,
            cancel: None,
        }
    }
}

impl<'a, P: BranchAndBound> BestFirstSearch<'a, P, P::Value> {
    /// Creates a search with the default configuration and no hooks.
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            config: SearchConfig::default(),
            on_progress: None,
            cancel: None,
        }
    }

    /// Maximizes the objective from `start` with `budget` remaining and
    /// returns only the optimal value.
    pub fn maximize(
        &mut self,
        start: P::State,
        budget: u32,
    ) -> Result<P::Value, SearchError<P::Error>> {
        self.run(start, budget).map(|outcome| outcome.value)
    }

    /// Maximizes the objective from `start` with `budget` remaining.
    ///
    /// A zero budget yields `objective(start)` without ever calling `branch`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::EmptySearchSpace`] when a node with budget left has
    ///   no successors
    /// - [`SearchError::BudgetNotDecreasing`] when a successor's budget is not
    ///   below its parent's
    /// - [`SearchError::NoSolutionFound`] when no terminal state was reached
    /// - [`SearchError::ExpansionLimit`] and [`SearchError::Cancelled`] from
    ///   the configured limits
    /// - [`SearchError::Problem`] for any failure of the problem itself
    pub fn run(
        &mut self,
        start: P::State,
        budget: u32,
    ) -> Result<SearchOutcome<P::State, P::Value>, SearchError<P::Error>> {
        debug!(budget, "starting best-first search");

        let mut frontier = Frontier::new();
        let start_bound = self
            .problem
            .bound(&start, budget)
            .map_err(SearchError::Problem)?;
        frontier.push(start_bound, start, budget);

        let mut incumbent: Option<(P::Value, P::State)> = None;
        let mut stats = SearchStats::default();
        let mut step = 0u64;

        while let Some(node) = frontier.pop() {
            if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                debug!(step, "search cancelled");
                return Err(SearchError::Cancelled);
            }
            step += 1;

            let mut finished = false;
            if node.budget == 0 {
                let value = self
                    .problem
                    .objective(&node.state)
                    .map_err(SearchError::Problem)?;
                stats.terminals += 1;
                if incumbent.as_ref().is_none_or(|(best, _)| value > *best) {
                    incumbent = Some((value, node.state));
                }
            } else if incumbent
                .as_ref()
                .is_some_and(|(best, _)| node.bound <= *best)
            {
                finished = true;
            } else {
                self.expand(node.state, node.budget, &mut frontier, &mut stats)?;
            }

            if let Some(on_progress) = self.on_progress.as_mut() {
                on_progress(&Progress {
                    step,
                    frontier_len: frontier.len(),
                    incumbent: incumbent.as_ref().map(|(best, _)| *best),
                });
            }
            if finished {
                break;
            }
        }

        stats.max_frontier = frontier.high_water();
        let (value, state) = incumbent.ok_or(SearchError::NoSolutionFound)?;
        debug!(
            value = ?value,
            expanded = stats.expanded,
            terminals = stats.terminals,
            max_frontier = stats.max_frontier,
            "best-first search finished"
        );

        Ok(SearchOutcome {
            value,
            state,
            stats,
        })
    }

    fn expand(
        &self,
        state: P::State,
        budget: u32,
        frontier: &mut Frontier<P::State, P::Value>,
        stats: &mut SearchStats,
    ) -> Result<(), SearchError<P::Error>> {
        if let Some(limit) = self.config.expansion_limit
            && stats.expanded >= limit
        {
            return Err(SearchError::ExpansionLimit(limit));
        }

        let successors = self
            .problem
            .branch(&state, budget)
            .map_err(SearchError::Problem)?;
        if successors.is_empty() {
            return Err(SearchError::EmptySearchSpace { budget });
        }
        stats.expanded += 1;

        for (child, child_budget) in successors {
            if child_budget >= budget {
                return Err(SearchError::BudgetNotDecreasing {
                    parent: budget,
                    child: child_budget,
                });
            }
            let bound = self
                .problem
                .bound(&child, child_budget)
                .map_err(SearchError::Problem)?;
            frontier.push(bound, child, child_budget);
        }

        if self.config.log_interval > 0 && stats.expanded % self.config.log_interval == 0 {
            trace!(
                expanded = stats.expanded,
                frontier = frontier.len(),
                "best-first search progress"
            );
        }
        Ok(())
    }
}

/// Builder for [`BestFirstSearch`].
pub struct SearchBuilder<'a, P, V> {
    problem: P,
    config: SearchConfig,
    on_progress: Option<ProgressFn<'a, V>>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a, P, V> SearchBuilder<'a, P, V> {
    /// Sets the problem to search.
    pub fn problem<Q>(self, problem: Q) -> SearchBuilder<'a, Q, V>
    where
        Q: BranchAndBound<Value = V>,
    {
        SearchBuilder {
            problem,
            config: self.config,
            on_progress: self.on_progress,
            cancel: self.cancel,
        }
    }

    /// Replaces the default [`SearchConfig`].
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs a callback invoked once per loop iteration. It only observes;
    /// it cannot influence the search.
    pub fn on_progress<F>(mut self, on_progress: F) -> Self
    where
        F: FnMut(&Progress<V>) + 'a,
    {
        self.on_progress = Some(Box::new(on_progress));
        self
    }

    /// Checks `flag` once per loop iteration and fails with
    /// [`SearchError::Cancelled`] once it is set.
    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }
}

impl<'a, P: BranchAndBound> SearchBuilder<'a, P, P::Value> {
    pub fn build(self) -> BestFirstSearch<'a, P, P::Value> {
        BestFirstSearch {
            problem: self.problem,
            config: self.config,
            on_progress: self.on_progress,
            cancel: self.cancel,
        }
    }
}
