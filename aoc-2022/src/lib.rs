//! Advent of Code 2022 solutions
//!
//! The shared [`utils::best_first`] optimizer drives the two scheduling
//! puzzles of the year: day 16 (opening valves against a clock) and day 19
//! (queueing robot builds). Each day is a [`aoc_solver::Solver`] with its
//! parts implemented as `PartSolver<N>`.

pub mod utils;

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
