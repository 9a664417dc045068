//! Timed solver instance

use crate::error::{ParseError, SolveError, SolverError};
use crate::solver::SolverExt;
use chrono::{DateTime, TimeDelta, Utc};

/// Answer to one part, with the wall-clock window it took to compute
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// The answer string
    pub answer: String,
    /// When solving started (UTC)
    pub solve_start: DateTime<Utc>,
    /// When solving completed (UTC)
    pub solve_end: DateTime<Utc>,
}

impl SolveResult {
    /// Get the solve duration as TimeDelta
    pub fn duration(&self) -> TimeDelta {
        self.solve_end - self.solve_start
    }
}

/// One parsed puzzle input for a specific year and day.
///
/// Parsing happens once in [`SolverInstance::new`]; each call to
/// [`SolverInstance::solve`] then runs a single part against the shared data,
/// so later parts observe whatever earlier parts cached.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverInstance};
///
/// #[derive(AocSolver)]
/// #[aoc_solver(max_parts = 1)]
/// struct Lines;
///
/// impl AocParser for Lines {
///     type SharedData<'a> = Vec<&'a str>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(input.lines().collect())
///     }
/// }
///
/// impl PartSolver<1> for Lines {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         Ok(shared.len().to_string())
///     }
/// }
///
/// let mut instance = SolverInstance::<Lines>::new(2022, 1, "a\nb").unwrap();
/// assert_eq!(instance.solve(1).unwrap().answer, "2");
/// assert!(instance.solve(2).is_err());
/// ```
pub struct SolverInstance<'a, S: SolverExt> {
    year: u16,
    day: u8,
    shared: S::SharedData<'a>,
    parse_start: DateTime<Utc>,
    parse_end: DateTime<Utc>,
}

impl<'a, S: SolverExt> SolverInstance<'a, S> {
    /// Parse `input`, recording when parsing started and ended.
    pub fn new(year: u16, day: u8, input: &'a str) -> Result<Self, ParseError> {
        let parse_start = Utc::now();
        let shared = S::parse(input)?;
        let parse_end = Utc::now();

        Ok(Self {
            year,
            day,
            shared,
            parse_start,
            parse_end,
        })
    }

    /// Solve one part with timing. Parts outside `1..=S::PARTS` are rejected
    /// with [`SolveError::PartOutOfRange`].
    pub fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError> {
        let solve_start = Utc::now();
        let answer = S::solve_part_checked_range(&mut self.shared, part)?;
        let solve_end = Utc::now();

        Ok(SolveResult {
            answer,
            solve_start,
            solve_end,
        })
    }

    /// Solve every part in order, stopping at the first failure.
    pub fn solve_all(&mut self) -> Result<Vec<SolveResult>, SolveError> {
        (1..=S::PARTS).map(|part| self.solve(part)).collect()
    }

    /// Read access to the parsed data.
    pub fn shared(&self) -> &S::SharedData<'a> {
        &self.shared
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn parts(&self) -> u8 {
        S::PARTS
    }

    pub fn parse_start(&self) -> DateTime<Utc> {
        self.parse_start
    }

    pub fn parse_end(&self) -> DateTime<Utc> {
        self.parse_end
    }

    pub fn parse_duration(&self) -> TimeDelta {
        self.parse_end - self.parse_start
    }
}

/// Parse `input` and solve every part of `S`.
///
/// Returns the parsed instance too, so callers can still read the parse
/// timings and the shared data.
pub fn solve_input<'a, S: SolverExt>(
    year: u16,
    day: u8,
    input: &'a str,
) -> Result<(SolverInstance<'a, S>, Vec<SolveResult>), SolverError> {
    let mut instance = SolverInstance::<S>::new(year, day, input)?;
    let results = instance.solve_all()?;
    Ok((instance, results))
}
