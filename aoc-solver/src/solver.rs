//! Parsing and solving traits

use crate::error::{ParseError, SolveError};

/// Turns raw puzzle input into the data every part works on.
///
/// `SharedData` is created once per input and handed mutably to each part in
/// turn, so a part may leave intermediate results behind for later parts.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError};
///
/// struct Elves;
///
/// impl AocParser for Elves {
///     type SharedData<'a> = Vec<u32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.trim().parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
///             .collect()
///     }
/// }
///
/// assert_eq!(Elves::parse("3\n4").unwrap(), vec![3, 4]);
/// ```
pub trait AocParser {
    /// Parsed input plus whatever the parts want to cache between each other.
    ///
    /// The lifetime allows zero-copy views into the input (`&'a str`) when no
    /// transformation is needed.
    type SharedData<'a>;

    /// Parse the input string into the shared data structure.
    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError>;
}

/// Solves part `N` of a puzzle.
///
/// Implementing one `PartSolver<N>` per part and deriving [`AocSolver`](crate::AocSolver)
/// produces the runtime dispatch of [`Solver::solve_part`].
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, PartSolver, ParseError, SolveError};
///
/// struct Elves;
///
/// impl AocParser for Elves {
///     type SharedData<'a> = Vec<u32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
///             .collect()
///     }
/// }
///
/// impl PartSolver<1> for Elves {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         Ok(shared.iter().max().copied().unwrap_or_default().to_string())
///     }
/// }
/// ```
pub trait PartSolver<const N: u8>: AocParser {
    /// Solve this part, returning the answer as it would be submitted.
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError>;
}

/// A complete puzzle solver with a fixed number of parts.
///
/// Usually derived:
///
/// ```
/// use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, Solver};
///
/// #[derive(AocSolver)]
/// #[aoc_solver(max_parts = 2)]
/// struct Elves;
///
/// impl AocParser for Elves {
///     type SharedData<'a> = Vec<u32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
///             .collect()
///     }
/// }
///
/// impl PartSolver<1> for Elves {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         Ok(shared.iter().sum::<u32>().to_string())
///     }
/// }
///
/// impl PartSolver<2> for Elves {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         Ok(shared.len().to_string())
///     }
/// }
///
/// let mut shared = Elves::parse("1\n2\n3").unwrap();
/// assert_eq!(Elves::solve_part(&mut shared, 1).unwrap(), "6");
/// assert_eq!(Elves::solve_part(&mut shared, 2).unwrap(), "3");
/// ```
pub trait Solver: AocParser {
    /// Number of parts this solver implements
    const PARTS: u8;

    /// Solve a specific part of the problem
    ///
    /// # Returns
    /// * `Ok(String)` - The answer for this part
    /// * `Err(SolveError::PartNotImplemented)` - The part is not implemented
    /// * `Err(SolveError::SolveFailed)` - An error occurred while solving
    fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError>;
}

pub trait SolverExt: Solver {
    /// Like [`Solver::solve_part`], but rejects parts outside `1..=PARTS`
    /// before touching the shared data.
    fn solve_part_checked_range(
        shared: &mut Self::SharedData<'_>,
        part: u8,
    ) -> Result<String, SolveError> {
        if (1..=Self::PARTS).contains(&part) {
            Self::solve_part(shared, part)
        } else {
            Err(SolveError::PartOutOfRange(part))
        }
    }

    /// Solves every part in order, stopping at the first failure.
    fn solve_all(shared: &mut Self::SharedData<'_>) -> Result<Vec<String>, SolveError> {
        (1..=Self::PARTS)
            .map(|part| Self::solve_part(shared, part))
            .collect()
    }
}

impl<T: Solver + ?Sized> SolverExt for T {}
