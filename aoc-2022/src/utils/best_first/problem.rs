//! Trait-based branch-and-bound problem definition.

use std::convert::Infallible;
use std::fmt::Debug;
use std::marker::PhantomData;

/// A maximization problem over a budgeted state space.
///
/// The three methods are the whole contract the optimizer needs:
///
/// - `branch` lists the successors of a state. Every successor budget must be
///   strictly lower than the parent's, and a state with budget left must have
///   at least one successor (conventionally an "idle until the budget runs out"
///   move to budget 0).
/// - `bound` is an upper bound on the best objective reachable from a state
///   with the given budget. It must never underestimate; a loose bound only
///   costs expansions.
/// - `objective` is the value of a state accepted as terminal (budget 0).
///
/// States are immutable values: `branch` returns new states and never
/// modifies its input.
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
/// use aoc_2022::utils::best_first::{BestFirstSearch, BranchAndBound};
///
/// /// Spend each unit of budget either idling or banking `gain` for two units.
/// struct Savings {
///     gain: u32,
/// }
///
/// impl BranchAndBound for Savings {
///     type State = u32;
///     type Value = u32;
///     type Error = Infallible;
///
///     fn branch(&self, banked: &u32, budget: u32) -> Result<Vec<(u32, u32)>, Infallible> {
///         let mut next = vec![(*banked, budget - 1)];
///         if budget >= 2 {
///             next.push((banked + self.gain, budget - 2));
///         }
///         Ok(next)
///     }
///
///     fn bound(&self, banked: &u32, budget: u32) -> Result<u32, Infallible> {
///         Ok(banked + self.gain * (budget / 2))
///     }
///
///     fn objective(&self, banked: &u32) -> Result<u32, Infallible> {
///         Ok(*banked)
///     }
/// }
///
/// let mut search = BestFirstSearch::new(Savings { gain: 3 });
/// assert_eq!(search.maximize(0, 5).unwrap(), 6);
/// ```
pub trait BranchAndBound {
    /// One configuration of the system being optimized.
    type State;

    /// Objective and bound values. Compared, never summed, by the optimizer.
    type Value: Ord + Copy + Debug;

    /// Failure raised by the problem itself; propagated unchanged.
    type Error: std::error::Error + 'static;

    /// Successor `(state, budget)` pairs of `state`.
    fn branch(
        &self,
        state: &Self::State,
        budget: u32,
    ) -> Result<Vec<(Self::State, u32)>, Self::Error>;

    /// Admissible upper bound on the objective reachable from `state`.
    fn bound(&self, state: &Self::State, budget: u32) -> Result<Self::Value, Self::Error>;

    /// Value of `state` when accepted as terminal.
    fn objective(&self, state: &Self::State) -> Result<Self::Value, Self::Error>;
}

impl<P: BranchAndBound + ?Sized> BranchAndBound for &P {
    type State = P::State;
    type Value = P::Value;
    type Error = P::Error;

    fn branch(
        &self,
        state: &Self::State,
        budget: u32,
    ) -> Result<Vec<(Self::State, u32)>, Self::Error> {
        (**self).branch(state, budget)
    }

    fn bound(&self, state: &Self::State, budget: u32) -> Result<Self::Value, Self::Error> {
        (**self).bound(state, budget)
    }

    fn objective(&self, state: &Self::State) -> Result<Self::Value, Self::Error> {
        (**self).objective(state)
    }
}

/// Wrapper to assemble a problem from three independent closures.
///
/// Each closure can be swapped on its own, which makes it easy to try a
/// different bound against the same branching rules.
///
/// # Example
///
/// ```rust
/// use aoc_2022::utils::best_first::{BestFirstSearch, ClosureProblem};
///
/// // Count down, collecting one point per unit of budget spent.
/// let problem = ClosureProblem::new(
///     |points: &u32, budget: u32| vec![(points + 1, budget - 1)],
///     |points: &u32, budget: u32| points + budget,
///     |points: &u32| *points,
/// );
///
/// assert_eq!(BestFirstSearch::new(problem).maximize(0, 7).unwrap(), 7);
/// ```
pub struct ClosureProblem<S, V, B, H, O>
where
    B: Fn(&S, u32) -> Vec<(S, u32)>,
    H: Fn(&S, u32) -> V,
    O: Fn(&S) -> V,
{
    branch_fn: B,
    bound_fn: H,
    objective_fn: O,
    _phantom: PhantomData<fn(&S) -> V>,
}

impl<S, V, B, H, O> ClosureProblem<S, V, B, H, O>
where
    B: Fn(&S, u32) -> Vec<(S, u32)>,
    H: Fn(&S, u32) -> V,
    O: Fn(&S) -> V,
{
    /// Creates a problem from its branching, bounding and objective functions.
    pub fn new(branch_fn: B, bound_fn: H, objective_fn: O) -> Self {
        Self {
            branch_fn,
            bound_fn,
            objective_fn,
            _phantom: PhantomData,
        }
    }
}

impl<S, V, B, H, O> BranchAndBound for ClosureProblem<S, V, B, H, O>
where
    V: Ord + Copy + Debug,
    B: Fn(&S, u32) -> Vec<(S, u32)>,
    H: Fn(&S, u32) -> V,
    O: Fn(&S) -> V,
{
    type State = S;
    type Value = V;
    type Error = Infallible;

    fn branch(&self, state: &S, budget: u32) -> Result<Vec<(S, u32)>, Infallible> {
        Ok((self.branch_fn)(state, budget))
    }

    fn bound(&self, state: &S, budget: u32) -> Result<V, Infallible> {
        Ok((self.bound_fn)(state, budget))
    }

    fn objective(&self, state: &S) -> Result<V, Infallible> {
        Ok((self.objective_fn)(state))
    }
}
