use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::iter::successors;

use anyhow::{Context, anyhow, bail};
use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError};
use regex::Regex;
use tracing::debug;

use crate::utils::best_first::{BestFirstSearch, BranchAndBound, SearchError};

/// Minutes before the volcano erupts when working alone.
pub const PART_ONE_MINUTES: u32 = 30;
/// Minutes left after teaching the elephant.
pub const PART_TWO_MINUTES: u32 = 26;

const START_VALVE: &str = "AA";
const MAX_USEFUL_VALVES: usize = u64::BITS as usize;
const SCAN_LINE: &str =
    r"^Valve (\w+) has flow rate=(\d+); tunnels? leads? to valves? (\w+(?:, \w+)*)$";

#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = ValveNetwork;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        ValveNetwork::from_scan(input).map_err(|e| ParseError::InvalidFormat(format!("{e:#}")))
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        max_release(shared, 1, PART_ONE_MINUTES)
            .map(|released| released.to_string())
            .map_err(|e| SolveError::SolveFailed(Box::new(e)))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        max_release(shared, 2, PART_TWO_MINUTES)
            .map(|released| released.to_string())
            .map_err(|e| SolveError::SolveFailed(Box::new(e)))
    }
}

/// Most pressure `agents` workers starting together at `AA` can release in
/// `minutes` minutes.
pub fn max_release(
    network: &ValveNetwork,
    agents: usize,
    minutes: u32,
) -> Result<u64, SearchError<Infallible>> {
    let start = Tour::new(network, agents, minutes);
    let budget = start.time_left();
    let outcome = BestFirstSearch::new(ValveTour::new(network)).run(start, budget)?;

    debug!(
        agents,
        minutes,
        released = outcome.value,
        expanded = outcome.stats.expanded,
        "valve tour finished"
    );
    Ok(outcome.value)
}

/// The scanned valves, compressed to the ones worth opening.
///
/// Positions used by a [`Tour`] are hubs: hub `j < useful_count()` is the
/// `j`-th useful valve (and bit `j` of the opened mask), and when `AA` itself
/// has no flow one extra hub stands for it.
#[derive(Debug, Clone)]
pub struct ValveNetwork {
    names: Vec<String>,
    useful: Vec<usize>,
    rates: Vec<u32>,
    start: usize,
    // distances[hub][j]: minutes from a hub to useful valve `j`
    distances: Vec<Vec<Option<u32>>>,
}

struct ScanLine<'a> {
    name: &'a str,
    rate: u32,
    tunnels: Vec<&'a str>,
}

fn parse_scan_line<'a>(re: &Regex, line: &'a str) -> anyhow::Result<ScanLine<'a>> {
    let caps = re
        .captures(line)
        .ok_or_else(|| anyhow!("unrecognised valve scan {line:?}"))?;
    let (_, [name, rate, tunnels]) = caps.extract();

    Ok(ScanLine {
        name,
        rate: rate.parse().context("flow rate out of range")?,
        tunnels: tunnels.split(", ").collect(),
    })
}

/// Minutes from `from` to every valve, `None` where no tunnel path exists.
fn walk_distances(tunnels: &[Vec<usize>], from: usize) -> Vec<Option<u32>> {
    let mut steps = vec![None; tunnels.len()];
    let mut queue = VecDeque::from([from]);
    steps[from] = Some(0);

    while let Some(valve) = queue.pop_front() {
        let next = steps[valve].map_or(0, |s| s + 1);
        for &neighbour in &tunnels[valve] {
            if steps[neighbour].is_none() {
                steps[neighbour] = Some(next);
                queue.push_back(neighbour);
            }
        }
    }
    steps
}

impl ValveNetwork {
    /// Builds the network from the puzzle's scan output, one valve per line.
    pub fn from_scan(input: &str) -> anyhow::Result<Self> {
        let re = Regex::new(SCAN_LINE)?;
        let scans = input
            .trim()
            .lines()
            .enumerate()
            .map(|(idx, line)| {
                parse_scan_line(&re, line.trim()).with_context(|| format!("line {}", idx + 1))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut index = HashMap::with_capacity(scans.len());
        for (i, scan) in scans.iter().enumerate() {
            if index.insert(scan.name, i).is_some() {
                bail!("valve {} is scanned twice", scan.name);
            }
        }

        let tunnels = scans
            .iter()
            .map(|scan| {
                scan.tunnels
                    .iter()
                    .map(|target| {
                        index.get(target).copied().ok_or_else(|| {
                            anyhow!("valve {} has a tunnel to unknown valve {target}", scan.name)
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let start_valve = *index
            .get(START_VALVE)
            .ok_or_else(|| anyhow!("no start valve {START_VALVE} in scan"))?;

        let useful: Vec<usize> = (0..scans.len()).filter(|&i| scans[i].rate > 0).collect();
        if useful.len() > MAX_USEFUL_VALVES {
            bail!(
                "{} valves have flow, at most {MAX_USEFUL_VALVES} are supported",
                useful.len()
            );
        }

        let start = useful
            .iter()
            .position(|&v| v == start_valve)
            .unwrap_or(useful.len());
        let mut hubs = useful.clone();
        if start == useful.len() {
            hubs.push(start_valve);
        }

        let distances = hubs
            .iter()
            .map(|&hub| {
                let steps = walk_distances(&tunnels, hub);
                useful.iter().map(|&v| steps[v]).collect()
            })
            .collect();

        debug!(valves = scans.len(), useful = useful.len(), "parsed valve scan");

        Ok(Self {
            names: scans.iter().map(|scan| scan.name.to_string()).collect(),
            rates: useful.iter().map(|&v| scans[v].rate).collect(),
            useful,
            start,
            distances,
        })
    }

    /// Number of valves with a non-zero flow rate.
    pub fn useful_count(&self) -> usize {
        self.useful.len()
    }

    /// Minutes to walk from `from` (a useful valve or `AA`) to the useful valve `to`.
    pub fn distance(&self, from: &str, to: &str) -> Option<u32> {
        let hub = match self.useful_position(from) {
            Some(j) => j,
            None if from == START_VALVE => self.start,
            None => return None,
        };
        self.distances[hub][self.useful_position(to)?]
    }

    fn useful_position(&self, name: &str) -> Option<usize> {
        self.useful.iter().position(|&v| self.names[v] == name)
    }
}

/// One worker: where it stands and how many minutes remain after the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Agent {
    time: u32,
    at: usize,
}

/// Partial plan of valve openings.
///
/// Agents are kept sorted by descending time so that the one with the most
/// time left is always first and swapped agents describe the same tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    agents: Vec<Agent>,
    opened: u64,
    released: u64,
}

impl Tour {
    /// `agents` workers standing on `AA` with `minutes` on the clock.
    pub fn new(network: &ValveNetwork, agents: usize, minutes: u32) -> Self {
        let agent = Agent {
            time: minutes.saturating_sub(1),
            at: network.start,
        };
        Self {
            agents: vec![agent; agents],
            opened: 0,
            released: 0,
        }
    }

    /// Minutes left summed over every agent.
    pub fn time_left(&self) -> u32 {
        self.agents.iter().map(|a| a.time).sum()
    }

    /// Total pressure the opened valves will release before time runs out.
    pub fn released(&self) -> u64 {
        self.released
    }

    fn is_open(&self, valve: usize) -> bool {
        self.opened & (1 << valve) != 0
    }

    fn canonical(mut self) -> Self {
        self.agents.sort_unstable_by(|a, b| b.cmp(a));
        self
    }
}

/// Branch-and-bound view of the valve network: the busiest agent either
/// walks to an unopened valve and opens it, or stops for good.
pub struct ValveTour<'n> {
    network: &'n ValveNetwork,
}

impl<'n> ValveTour<'n> {
    pub fn new(network: &'n ValveNetwork) -> Self {
        Self { network }
    }

    fn reachable(&self, tour: &Tour, valve: usize) -> bool {
        tour.agents
            .iter()
            .any(|a| self.network.distances[a.at][valve].is_some_and(|d| d < a.time))
    }
}

impl BranchAndBound for ValveTour<'_> {
    type State = Tour;
    type Value = u64;
    type Error = Infallible;

    fn branch(&self, tour: &Tour, _budget: u32) -> Result<Vec<(Tour, u32)>, Infallible> {
        let Some(&mover) = tour.agents.first() else {
            return Ok(Vec::new());
        };

        let mut next = Vec::new();
        for (valve, &rate) in self.network.rates.iter().enumerate() {
            if tour.is_open(valve) {
                continue;
            }
            let Some(dist) = self.network.distances[mover.at][valve] else {
                continue;
            };
            if dist >= mover.time {
                continue;
            }

            let mut child = tour.clone();
            child.agents[0] = Agent {
                time: mover.time - dist - 1,
                at: valve,
            };
            child.opened |= 1 << valve;
            child.released = child
                .released
                .saturating_add(u64::from(rate) * u64::from(mover.time - dist));
            let child = child.canonical();
            let budget = child.time_left();
            next.push((child, budget));
        }

        let mut retired = tour.clone();
        retired.agents[0].time = 0;
        let retired = retired.canonical();
        let budget = retired.time_left();
        next.push((retired, budget));

        Ok(next)
    }

    /// Pairs the largest remaining rates with the latest opening minutes the
    /// agents could still manage, two minutes apart per agent.
    fn bound(&self, tour: &Tour, _budget: u32) -> Result<u64, Infallible> {
        let useful = self.network.rates.len();

        let mut rates: Vec<u32> = (0..useful)
            .filter(|&valve| !tour.is_open(valve) && self.reachable(tour, valve))
            .map(|valve| self.network.rates[valve])
            .collect();
        rates.sort_unstable_by(|a, b| b.cmp(a));

        let mut slots: Vec<u32> = tour
            .agents
            .iter()
            .flat_map(|agent| {
                let standing_on_closed = agent.at < useful && !tour.is_open(agent.at);
                let first = agent.time.checked_sub(u32::from(!standing_on_closed));
                successors(first.filter(|&t| t > 0), |&t| {
                    t.checked_sub(2).filter(|&t| t > 0)
                })
                .take(rates.len())
            })
            .collect();
        slots.sort_unstable_by(|a, b| b.cmp(a));

        let potential = rates
            .iter()
            .zip(&slots)
            .map(|(&rate, &slot)| u64::from(rate) * u64::from(slot))
            .fold(0u64, u64::saturating_add);
        Ok(tour.released.saturating_add(potential))
    }

    fn objective(&self, tour: &Tour) -> Result<u64, Infallible> {
        Ok(tour.released)
    }
}
