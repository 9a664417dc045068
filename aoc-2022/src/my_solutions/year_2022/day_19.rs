use std::convert::Infallible;

use anyhow::{Context, anyhow, bail};
use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError};
use regex::Regex;
use tracing::debug;

use crate::utils::best_first::{BestFirstSearch, BranchAndBound, SearchError};

pub const PART_ONE_MINUTES: u32 = 24;
pub const PART_TWO_MINUTES: u32 = 32;
/// Part 2 only looks at the blueprints the elephants did not eat.
pub const PART_TWO_BLUEPRINTS: usize = 3;

const BLUEPRINT: &str = r"^Blueprint (\d+): Each ore robot costs (\d+) ore\. Each clay robot costs (\d+) ore\. Each obsidian robot costs (\d+) ore and (\d+) clay\. Each geode robot costs (\d+) ore and (\d+) obsidian\.$";

#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = Vec<Blueprint>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let blueprints =
            parse_blueprints(input).map_err(|e| ParseError::InvalidFormat(format!("{e:#}")))?;
        if blueprints.is_empty() {
            return Err(ParseError::MissingData("no blueprints in input".to_string()));
        }
        Ok(blueprints)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .map(|blueprint| {
                max_geodes(blueprint, PART_ONE_MINUTES)
                    .map(|geodes| u64::from(blueprint.number) * u64::from(geodes))
            })
            .sum::<Result<u64, _>>()
            .map(|quality| quality.to_string())
            .map_err(|e| SolveError::SolveFailed(Box::new(e)))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .take(PART_TWO_BLUEPRINTS)
            .map(|blueprint| max_geodes(blueprint, PART_TWO_MINUTES).map(u64::from))
            .product::<Result<u64, _>>()
            .map(|product| product.to_string())
            .map_err(|e| SolveError::SolveFailed(Box::new(e)))
    }
}

/// Most geodes a factory running `blueprint` can crack open in `minutes`.
pub fn max_geodes(blueprint: &Blueprint, minutes: u32) -> Result<u32, SearchError<Infallible>> {
    let outcome = BestFirstSearch::new(Factory::new(blueprint)).run(FactoryState::new(), minutes)?;
    debug!(
        blueprint = blueprint.number,
        minutes,
        geodes = outcome.value,
        expanded = outcome.stats.expanded,
        max_frontier = outcome.stats.max_frontier,
        "blueprint evaluated"
    );
    Ok(outcome.value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Ore,
    Clay,
    Obsidian,
    Geode,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Ore,
        Resource::Clay,
        Resource::Obsidian,
        Resource::Geode,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// An amount of each resource. Also used to count robots by the resource
/// they collect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResourceSet([u32; 4]);

impl ResourceSet {
    pub const fn new(ore: u32, clay: u32, obsidian: u32, geode: u32) -> Self {
        Self([ore, clay, obsidian, geode])
    }

    /// A single unit of `resource`.
    pub fn with_one(resource: Resource) -> Self {
        let mut set = Self::default();
        set.0[resource.index()] = 1;
        set
    }

    pub fn get(&self, resource: Resource) -> u32 {
        self.0[resource.index()]
    }

    /// Amounts saturate at `u32::MAX`.
    pub fn add(&self, other: &Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].saturating_add(other.0[i])))
    }

    /// `None` when any amount of `other` exceeds what is held.
    pub fn subtract(&self, other: &Self) -> Option<Self> {
        let mut out = Self::default();
        for i in 0..out.0.len() {
            out.0[i] = self.0[i].checked_sub(other.0[i])?;
        }
        Some(out)
    }

    pub fn scale(&self, factor: u32) -> Self {
        Self(self.0.map(|amount| amount.saturating_mul(factor)))
    }

    /// True when every amount in `cost` is available.
    pub fn covers(&self, cost: &Self) -> bool {
        self.0.iter().zip(&cost.0).all(|(held, needed)| held >= needed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub number: u32,
    costs: [ResourceSet; 4],
}

impl Blueprint {
    pub fn new(
        number: u32,
        ore_robot: ResourceSet,
        clay_robot: ResourceSet,
        obsidian_robot: ResourceSet,
        geode_robot: ResourceSet,
    ) -> Self {
        Self {
            number,
            costs: [ore_robot, clay_robot, obsidian_robot, geode_robot],
        }
    }

    /// What a robot collecting `robot` costs to build.
    pub fn cost(&self, robot: Resource) -> &ResourceSet {
        &self.costs[robot.index()]
    }
}

fn parse_blueprint(re: &Regex, text: &str) -> anyhow::Result<Blueprint> {
    let caps = re
        .captures(text)
        .ok_or_else(|| anyhow!("unrecognised blueprint {text:?}"))?;
    let (_, fields) = caps.extract::<7>();
    let mut numbers = [0u32; 7];
    for (number, field) in numbers.iter_mut().zip(fields) {
        *number = field
            .parse()
            .with_context(|| format!("{field} is out of range"))?;
    }
    let [number, ore, clay, obsidian_ore, obsidian_clay, geode_ore, geode_obsidian] = numbers;

    Ok(Blueprint::new(
        number,
        ResourceSet::new(ore, 0, 0, 0),
        ResourceSet::new(clay, 0, 0, 0),
        ResourceSet::new(obsidian_ore, obsidian_clay, 0, 0),
        ResourceSet::new(geode_ore, 0, geode_obsidian, 0),
    ))
}

/// Blueprints may wrap over several lines, so the input is split on the
/// word `Blueprint` rather than on newlines.
pub fn parse_blueprints(input: &str) -> anyhow::Result<Vec<Blueprint>> {
    let re = Regex::new(BLUEPRINT)?;
    let mut chunks = input.split("Blueprint");
    if let Some(preamble) = chunks.next()
        && !preamble.trim().is_empty()
    {
        bail!("unexpected text before the first blueprint: {:?}", preamble.trim());
    }

    chunks
        .enumerate()
        .map(|(idx, chunk)| {
            let text = format!(
                "Blueprint {}",
                chunk.split_whitespace().collect::<Vec<_>>().join(" ")
            );
            parse_blueprint(&re, &text).with_context(|| format!("blueprint #{}", idx + 1))
        })
        .collect()
}

/// Stockpile and robot fleet at the start of a minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactoryState {
    pub resources: ResourceSet,
    pub robots: ResourceSet,
    pub being_built: Option<Resource>,
}

impl Default for FactoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryState {
    /// Empty stockpile and a single ore robot.
    pub fn new() -> Self {
        Self {
            resources: ResourceSet::default(),
            robots: ResourceSet::with_one(Resource::Ore),
            being_built: None,
        }
    }

    /// Lets every robot collect for `minutes`. A robot under construction
    /// joins the fleet at the end of the first minute.
    pub fn gather(&self, minutes: u32) -> Self {
        if minutes == 0 {
            return *self;
        }
        let resources = self.resources.add(&self.robots);
        let robots = match self.being_built {
            Some(robot) => self.robots.add(&ResourceSet::with_one(robot)),
            None => self.robots,
        };
        Self {
            resources: resources.add(&robots.scale(minutes - 1)),
            robots,
            being_built: None,
        }
    }

    /// Pays for a `robot` and puts it on the line. `None` when the stockpile
    /// cannot cover it or the line is busy.
    pub fn build(&self, blueprint: &Blueprint, robot: Resource) -> Option<Self> {
        if self.being_built.is_some() {
            return None;
        }
        Some(Self {
            resources: self.resources.subtract(blueprint.cost(robot))?,
            robots: self.robots,
            being_built: Some(robot),
        })
    }

    /// Minutes of gathering before `robot` is affordable, `None` when the
    /// fleet does not collect something it needs or the wait exceeds `u32`.
    pub fn turns_to_save(&self, blueprint: &Blueprint, robot: Resource) -> Option<u32> {
        let cost = blueprint.cost(robot);
        if self.resources.covers(cost) {
            return Some(0);
        }
        let after_one = self.resources.add(&self.robots);
        if after_one.covers(cost) {
            return Some(1);
        }

        let rates = match self.being_built {
            Some(building) => self.robots.add(&ResourceSet::with_one(building)),
            None => self.robots,
        };
        let mut turns = 0;
        for resource in Resource::ALL {
            let needed = cost.get(resource).saturating_sub(after_one.get(resource));
            if needed == 0 {
                continue;
            }
            let rate = rates.get(resource);
            if rate == 0 {
                return None;
            }
            turns = turns.max(needed.div_ceil(rate));
        }
        turns.checked_add(1)
    }

    /// No point building more `robot`s than any single build can consume.
    pub fn has_enough(&self, blueprint: &Blueprint, robot: Resource) -> bool {
        if robot == Resource::Geode {
            return false;
        }
        let fleet = self.robots.get(robot);
        Resource::ALL
            .iter()
            .all(|&r| blueprint.cost(r).get(robot) <= fleet)
    }

    pub fn geodes(&self) -> u32 {
        self.resources.get(Resource::Geode)
    }
}

/// Branch-and-bound view of a robot factory for one blueprint.
pub struct Factory<'b> {
    blueprint: &'b Blueprint,
}

impl<'b> Factory<'b> {
    pub fn new(blueprint: &'b Blueprint) -> Self {
        Self { blueprint }
    }
}

impl BranchAndBound for Factory<'_> {
    type State = FactoryState;
    type Value = u32;
    type Error = Infallible;

    /// Skips straight to the next robot worth building, or idles out the clock.
    fn branch(
        &self,
        state: &FactoryState,
        budget: u32,
    ) -> Result<Vec<(FactoryState, u32)>, Infallible> {
        let mut next: Vec<_> = Resource::ALL
            .into_iter()
            .filter(|&robot| !state.has_enough(self.blueprint, robot))
            .filter_map(|robot| {
                let turns = state
                    .turns_to_save(self.blueprint, robot)
                    .filter(|&turns| turns < budget.saturating_sub(1))?;
                let built = state
                    .gather(turns)
                    .build(self.blueprint, robot)?
                    .gather(1);
                Some((built, budget - turns - 1))
            })
            .collect();
        next.push((state.gather(budget), 0));
        Ok(next)
    }

    /// Current geodes, plus what the geode fleet collects, plus one new geode
    /// robot every remaining minute.
    fn bound(&self, state: &FactoryState, budget: u32) -> Result<u32, Infallible> {
        let budget = u64::from(budget);
        let geodes = u64::from(state.geodes())
            + budget * u64::from(state.robots.get(Resource::Geode))
            + budget * budget.saturating_sub(1) / 2;
        Ok(u32::try_from(geodes).unwrap_or(u32::MAX))
    }

    fn objective(&self, state: &FactoryState) -> Result<u32, Infallible> {
        Ok(state.geodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "\
Blueprint 1:
  Each ore robot costs 4 ore.
  Each clay robot costs 2 ore.
  Each obsidian robot costs 3 ore and 14 clay.
  Each geode robot costs 2 ore and 7 obsidian.

Blueprint 2:
  Each ore robot costs 2 ore.
  Each clay robot costs 3 ore.
  Each obsidian robot costs 3 ore and 8 clay.
  Each geode robot costs 3 ore and 12 obsidian.
";

    fn example_blueprints() -> Vec<Blueprint> {
        Solver::parse(EXAMPLE).unwrap()
    }

    #[test]
    fn parses_wrapped_and_single_line_blueprints() {
        let wrapped = example_blueprints();
        let single_line = Solver::parse(
            "Blueprint 1: Each ore robot costs 4 ore. Each clay robot costs 2 ore. Each obsidian robot costs 3 ore and 14 clay. Each geode robot costs 2 ore and 7 obsidian.\n\
             Blueprint 2: Each ore robot costs 2 ore. Each clay robot costs 3 ore. Each obsidian robot costs 3 ore and 8 clay. Each geode robot costs 3 ore and 12 obsidian.",
        )
        .unwrap();

        assert_eq!(wrapped, single_line);
        assert_eq!(wrapped[1].number, 2);
        assert_eq!(
            *wrapped[0].cost(Resource::Obsidian),
            ResourceSet::new(3, 14, 0, 0)
        );
        assert_eq!(
            *wrapped[1].cost(Resource::Geode),
            ResourceSet::new(3, 0, 12, 0)
        );
    }

    #[test]
    fn resource_set_operations() {
        let held = ResourceSet::new(5, 3, 0, 1);
        let cost = ResourceSet::new(2, 3, 0, 0);

        assert_eq!(held.add(&cost), ResourceSet::new(7, 6, 0, 1));
        assert_eq!(held.subtract(&cost), Some(ResourceSet::new(3, 0, 0, 1)));
        assert_eq!(cost.subtract(&held), None);
        assert_eq!(cost.scale(3), ResourceSet::new(6, 9, 0, 0));
        assert!(held.covers(&cost));
        assert!(!cost.covers(&held));
        assert_eq!(ResourceSet::with_one(Resource::Obsidian).get(Resource::Obsidian), 1);
        assert_eq!(held.get(Resource::Geode), 1);
    }

    #[test]
    fn replays_the_first_example_schedule() {
        let blueprint = &example_blueprints()[0];
        let schedule = [
            (2, Some(Resource::Clay)),
            (2, Some(Resource::Clay)),
            (2, Some(Resource::Clay)),
            (4, Some(Resource::Obsidian)),
            (1, Some(Resource::Clay)),
            (3, Some(Resource::Obsidian)),
            (3, Some(Resource::Geode)),
            (3, Some(Resource::Geode)),
            (4, None),
        ];

        let end = schedule
            .iter()
            .fold(FactoryState::new(), |state, &(minutes, robot)| {
                let state = state.gather(minutes);
                match robot {
                    Some(robot) => state.build(blueprint, robot).unwrap(),
                    None => state,
                }
            });
        assert_eq!(end.resources, ResourceSet::new(6, 41, 8, 9));
    }

    #[test]
    fn build_needs_funds_and_a_free_line() {
        let blueprint = &example_blueprints()[0];
        let start = FactoryState::new();
        assert_eq!(start.build(blueprint, Resource::Clay), None);

        let building = start.gather(2).build(blueprint, Resource::Clay).unwrap();
        assert_eq!(building.resources, ResourceSet::default());
        assert_eq!(building.being_built, Some(Resource::Clay));
        let second = building.gather(5).build(blueprint, Resource::Clay).unwrap();
        assert_eq!(second.resources, ResourceSet::new(3, 4, 0, 0));
        assert_eq!(building.build(blueprint, Resource::Ore), None);

        let running = building.gather(1);
        assert_eq!(running.robots, ResourceSet::new(1, 1, 0, 0));
        assert_eq!(running.resources, ResourceSet::new(1, 0, 0, 0));
        assert_eq!(running.being_built, None);
    }

    #[test]
    fn turns_to_save_matches_gathering() {
        let blueprint = &example_blueprints()[0];
        let start = FactoryState::new();

        assert_eq!(start.turns_to_save(blueprint, Resource::Clay), Some(2));
        assert_eq!(start.turns_to_save(blueprint, Resource::Ore), Some(4));
        assert_eq!(start.turns_to_save(blueprint, Resource::Obsidian), None);
        assert_eq!(start.turns_to_save(blueprint, Resource::Geode), None);

        for robot in [Resource::Ore, Resource::Clay] {
            let turns = start.turns_to_save(blueprint, robot).unwrap();
            assert!(start.gather(turns).build(blueprint, robot).is_some());
            assert!(start.gather(turns - 1).build(blueprint, robot).is_none());
        }

        let rich = FactoryState {
            resources: ResourceSet::new(4, 0, 0, 0),
            ..start
        };
        assert_eq!(rich.turns_to_save(blueprint, Resource::Ore), Some(0));
    }

    #[test]
    fn saturated_robots_are_not_built() {
        let blueprint = &example_blueprints()[0];
        let state = FactoryState {
            robots: ResourceSet::new(4, 14, 7, 0),
            ..FactoryState::new()
        };
        assert!(state.has_enough(blueprint, Resource::Ore));
        assert!(state.has_enough(blueprint, Resource::Clay));
        assert!(state.has_enough(blueprint, Resource::Obsidian));
        assert!(!state.has_enough(blueprint, Resource::Geode));
        assert!(!FactoryState::new().has_enough(blueprint, Resource::Ore));
    }

    #[test]
    fn branches_skip_to_the_next_affordable_robot() {
        let blueprint = &example_blueprints()[0];
        let start = FactoryState::new();
        let children = Factory::new(blueprint).branch(&start, 24).unwrap();

        let expected = vec![
            (
                FactoryState {
                    resources: ResourceSet::new(1, 0, 0, 0),
                    robots: ResourceSet::new(2, 0, 0, 0),
                    being_built: None,
                },
                19,
            ),
            (
                FactoryState {
                    resources: ResourceSet::new(1, 0, 0, 0),
                    robots: ResourceSet::new(1, 1, 0, 0),
                    being_built: None,
                },
                21,
            ),
            (
                FactoryState {
                    resources: ResourceSet::new(24, 0, 0, 0),
                    robots: ResourceSet::new(1, 0, 0, 0),
                    being_built: None,
                },
                0,
            ),
        ];
        assert_eq!(children, expected);
    }

    #[test]
    fn bound_counts_one_new_geode_robot_per_minute() {
        let blueprint = &example_blueprints()[0];
        let state = FactoryState {
            resources: ResourceSet::new(0, 0, 0, 2),
            robots: ResourceSet::new(1, 0, 0, 3),
            being_built: None,
        };
        let factory = Factory::new(blueprint);
        assert_eq!(factory.bound(&state, 4).unwrap(), 2 + 12 + 6);
        assert_eq!(factory.bound(&state, 0).unwrap(), 2);
    }

    #[test]
    fn example_max_geodes_in_24_minutes() {
        let blueprints = example_blueprints();
        assert_eq!(max_geodes(&blueprints[0], PART_ONE_MINUTES).unwrap(), 9);
        assert_eq!(max_geodes(&blueprints[1], PART_ONE_MINUTES).unwrap(), 12);
    }

    #[test]
    fn unreachable_costs_do_not_overflow() {
        let blueprint = Blueprint::new(
            1,
            ResourceSet::new(4, 0, 0, 0),
            ResourceSet::new(2, 0, 0, 0),
            ResourceSet::new(3, u32::MAX, 0, 0),
            ResourceSet::new(2, 0, 7, 0),
        );
        let waiting = FactoryState {
            being_built: Some(Resource::Clay),
            ..FactoryState::new()
        };
        assert_eq!(waiting.turns_to_save(&blueprint, Resource::Obsidian), None);
        assert_eq!(max_geodes(&blueprint, PART_ONE_MINUTES).unwrap(), 0);

        let mut blueprints = Solver::parse(
            "Blueprint 1: Each ore robot costs 4 ore. Each clay robot costs 2 ore. \
             Each obsidian robot costs 3 ore and 4294967295 clay. Each geode robot costs 2 ore and 7 obsidian.",
        )
        .unwrap();
        assert_eq!(Solver::solve_part(&mut blueprints, 1).unwrap(), "0");
    }

    #[test]
    fn large_quality_levels_are_summed_exactly() {
        let mut blueprints = example_blueprints();
        blueprints[0].number = u32::MAX;
        let quality = u64::from(u32::MAX) * 9 + 2 * 12;
        assert_eq!(Solver::solve_part(&mut blueprints, 1).unwrap(), quality.to_string());
    }

    #[test]
    fn example_part_1() {
        let mut blueprints = example_blueprints();
        assert_eq!(Solver::solve_part(&mut blueprints, 1).unwrap(), "33");
    }

    #[test]
    fn example_part_2() {
        let mut blueprints = example_blueprints();
        assert_eq!(Solver::solve_part(&mut blueprints, 2).unwrap(), "3472");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Solver::parse("  \n"),
            Err(ParseError::MissingData(_))
        ));

        let err = Solver::parse("Blueprint 1: Each ore robot costs four ore.").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
        assert!(err.to_string().contains("blueprint #1"), "{err}");

        let err = Solver::parse("Robots! Blueprint 1: Each ore robot costs 4 ore.").unwrap_err();
        assert!(err.to_string().contains("before the first blueprint"), "{err}");
    }
}
