//! Error type for the best-first search.

use thiserror::Error;

/// Why a search stopped without an answer.
///
/// `E` is the error type of the problem being searched; problem failures are
/// passed through untouched as [`SearchError::Problem`].
#[derive(Debug, Error)]
pub enum SearchError<E> {
    /// A state with budget left produced no successors.
    #[error("state with budget {budget} produced no successors")]
    EmptySearchSpace { budget: u32 },

    /// The frontier ran dry before any terminal state was reached.
    ///
    /// Unreachable while `branch` keeps budgets strictly decreasing and never
    /// returns an empty list for a positive budget, since every path then
    /// ends at a budget-0 terminal. The search still reports it rather than
    /// panicking.
    #[error("frontier exhausted without reaching a terminal state")]
    NoSolutionFound,

    /// A successor was handed a budget that is not below its parent's.
    #[error("successor budget {child} does not decrease parent budget {parent}")]
    BudgetNotDecreasing { parent: u32, child: u32 },

    /// `SearchConfig::expansion_limit` expansions were spent without finishing.
    #[error("expansion limit of {0} reached before the search finished")]
    ExpansionLimit(u64),

    /// The cancellation flag was raised.
    #[error("search cancelled")]
    Cancelled,

    /// The problem's own `branch`, `bound` or `objective` failed.
    #[error(transparent)]
    Problem(E),
}
