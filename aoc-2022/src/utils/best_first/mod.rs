//! Bounded best-first branch-and-bound search.
//!
//! A problem is described by a [`BranchAndBound`] implementation (or three
//! closures wrapped in a [`ClosureProblem`]) over states that carry a
//! non-negative integer budget. [`BestFirstSearch`] explores states in order
//! of decreasing upper bound and returns the best objective among states whose
//! budget reached zero. Expansion stops as soon as the most promising open
//! state cannot beat the incumbent.
//!
//! ```rust
//! use aoc_2022::utils::best_first::{BestFirstSearch, ClosureProblem};
//!
//! // Walk a chain of single-step moves; only the end of the chain pays.
//! let problem = ClosureProblem::new(
//!     |at: &u32, budget: u32| vec![(at + 1, budget - 1)],
//!     |at: &u32, budget: u32| at + budget,
//!     |at: &u32| *at,
//! );
//! assert_eq!(BestFirstSearch::new(problem).maximize(0, 29).unwrap(), 29);
//! ```

mod error;
mod frontier;
mod problem;
mod search;

pub use error::SearchError;
pub use problem::{BranchAndBound, ClosureProblem};
pub use search::{
    BestFirstSearch, NoProblem, Progress, SearchBuilder, SearchConfig, SearchOutcome, SearchStats,
};
