//! Advent of Code Solver Library
//!
//! A small, type-safe framework for puzzle solvers. Each puzzle is a type that
//! knows how to parse its input once ([`AocParser`]) and how to solve each of
//! its parts against the parsed data ([`PartSolver`]). Deriving [`AocSolver`]
//! turns the per-part impls into a [`Solver`] with runtime part dispatch.
//!
//! # Quick Example
//!
//! ```
//! use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverInstance};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! struct Calories;
//!
//! impl AocParser for Calories {
//!     type SharedData<'a> = Vec<u32>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Calories {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().max().copied().unwrap_or_default().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Calories {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         shared.sort_unstable_by(|a, b| b.cmp(a));
//!         Ok(shared.iter().take(3).sum::<u32>().to_string())
//!     }
//! }
//!
//! let mut instance = SolverInstance::<Calories>::new(2022, 1, "4\n9\n1\n7").unwrap();
//! assert_eq!(instance.solve(1).unwrap().answer, "9");
//! assert_eq!(instance.solve(2).unwrap().answer, "20");
//! ```
//!
//! # Part Dependencies
//!
//! Parts receive `&mut SharedData`, so a part can cache intermediate results
//! for the parts after it. Parts that only read simply never mutate.

mod error;
mod instance;
mod solver;

// Re-export public API
pub use error::{ParseError, SolveError, SolverError};
pub use instance::{SolveResult, SolverInstance, solve_input};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Re-export the derive macro
pub use aoc_solver_macros::AocSolver;
