//! A* search over [`PuzzleState`]s.
//!
//! Solvability is decided by racing two searches in lockstep: one from the
//! initial state and one from its [twin](PuzzleState::twin). Exactly one of the
//! two can reach the goal, so whichever race gets there first settles the
//! question and the loop always terminates.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::error::InvalidInitialState;
use crate::puzzle::{Move, PuzzleState};

type NodeId = usize;

/// Knobs for a single solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveOptions {
    closed_set: bool,
}

impl SolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip states that were already expanded in the same race.
    ///
    /// Off by default: only the immediate predecessor is filtered, and a state
    /// reached again by a longer path may be expanded twice. Turning it on
    /// trades memory for fewer expansions; move counts are unaffected.
    pub fn closed_set(mut self, enabled: bool) -> Self {
        self.closed_set = enabled;
        self
    }

    pub fn uses_closed_set(&self) -> bool {
        self.closed_set
    }
}

/// Node counters for one race.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded
    pub expanded: usize,
    /// Nodes pushed onto the frontier, roots included
    pub enqueued: usize,
}

/// Counters for both races of a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaceStats {
    pub original: SearchStats,
    pub twin: SearchStats,
}

/// Terminal state of a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The original race reached the goal
    Solved,
    /// The twin race reached the goal, or the original race ran dry
    Unsolvable,
}

/// What a finished solve reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub is_solvable: bool,
    /// Minimum number of slides, present iff solvable
    pub move_count: Option<u32>,
    /// Initial state through goal, present iff solvable
    pub path: Option<Vec<PuzzleState>>,
}

impl SolveOutcome {
    /// The blank movements along `path`.
    pub fn moves_between(&self) -> Option<Vec<Move>> {
        let path = self.path.as_ref()?;
        path.windows(2)
            .map(|pair| {
                Move::ALL
                    .iter()
                    .copied()
                    .find(|&dir| pair[0].slide(dir).as_ref() == Some(&pair[1]))
            })
            .collect()
    }
}

struct SearchNode {
    state: PuzzleState,
    moves: u32,
    parent: Option<NodeId>,
    heuristic: OnceCell<u32>,
}

impl SearchNode {
    fn new(state: PuzzleState, moves: u32, parent: Option<NodeId>) -> Self {
        Self {
            state,
            moves,
            parent,
            heuristic: OnceCell::new(),
        }
    }

    fn heuristic(&self) -> u32 {
        *self
            .heuristic
            .get_or_init(|| self.state.displacement_distance())
    }

    fn priority(&self) -> u32 {
        self.moves + self.heuristic()
    }
}

/// Pending nodes bucketed by priority. Equal priorities pop in insertion order.
#[derive(Default)]
struct Frontier {
    buckets: BTreeMap<u32, VecDeque<NodeId>>,
    len: usize,
}

impl Frontier {
    fn insert(&mut self, priority: u32, id: NodeId) {
        self.buckets.entry(priority).or_default().push_back(id);
        self.len += 1;
    }

    fn pop_min(&mut self) -> Option<NodeId> {
        let mut entry = self.buckets.first_entry()?;
        let id = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        if id.is_some() {
            self.len -= 1;
        }
        id
    }

    fn len(&self) -> usize {
        self.len
    }
}

enum RaceStep {
    Reached(NodeId),
    Expanded,
    Exhausted,
}

/// One A* search: a node arena, its frontier and optional closed set.
struct Race {
    nodes: Vec<SearchNode>,
    frontier: Frontier,
    closed: Option<HashSet<PuzzleState>>,
    stats: SearchStats,
}

impl Race {
    fn new(root: PuzzleState, options: SolveOptions) -> Self {
        let mut race = Self {
            nodes: Vec::new(),
            frontier: Frontier::default(),
            closed: options.closed_set.then(HashSet::new),
            stats: SearchStats::default(),
        };
        race.push(SearchNode::new(root, 0, None));
        race
    }

    fn push(&mut self, node: SearchNode) {
        let id = self.nodes.len();
        let priority = node.priority();
        self.nodes.push(node);
        self.frontier.insert(priority, id);
        self.stats.enqueued += 1;
    }

    /// Pops the best node and either reports it as the goal or expands it.
    fn step(&mut self) -> RaceStep {
        loop {
            let Some(id) = self.frontier.pop_min() else {
                return RaceStep::Exhausted;
            };

            if let Some(closed) = &mut self.closed {
                if !closed.insert(self.nodes[id].state.clone()) {
                    continue;
                }
            }

            if self.nodes[id].state.is_goal() {
                return RaceStep::Reached(id);
            }

            self.expand(id);
            return RaceStep::Expanded;
        }
    }

    fn expand(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let moves = node.moves + 1;
        let predecessor = node.parent.map(|p| &self.nodes[p].state);

        let successors: Vec<PuzzleState> = node
            .state
            .neighbors()
            .into_iter()
            .filter(|next| predecessor != Some(next))
            .filter(|next| self.closed.as_ref().map_or(true, |c| !c.contains(next)))
            .collect();

        tracing::trace!(
            moves = node.moves,
            priority = node.priority(),
            successors = successors.len(),
            "expanding node"
        );

        for state in successors {
            self.push(SearchNode::new(state, moves, Some(id)));
        }
        self.stats.expanded += 1;
    }

    /// States from the root to `id`, root first.
    fn path_to(&self, id: NodeId) -> Vec<PuzzleState> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current];
            path.push(node.state.clone());
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

/// A finished solve of one initial state.
///
/// The whole search runs inside [`PuzzleSolver::new`]; once constructed the
/// solver is in a terminal [`SolveStatus`] and only answers queries.
#[derive(Debug, Clone)]
pub struct PuzzleSolver {
    initial: PuzzleState,
    status: SolveStatus,
    path: Option<Vec<PuzzleState>>,
    stats: RaceStats,
}

impl PuzzleSolver {
    /// Solves `initial` with default options.
    pub fn new(initial: impl Into<Option<PuzzleState>>) -> Result<Self, InvalidInitialState> {
        Self::with_options(initial, SolveOptions::default())
    }

    pub fn with_options(
        initial: impl Into<Option<PuzzleState>>,
        options: SolveOptions,
    ) -> Result<Self, InvalidInitialState> {
        let initial = initial.into().ok_or(InvalidInitialState)?;
        let _span = tracing::debug_span!("solve", dimension = initial.dimension()).entered();

        let mut original = Race::new(initial.clone(), options);
        let mut twin = Race::new(initial.twin(), options);
        let mut twin_exhausted = false;

        let (status, path) = loop {
            match original.step() {
                RaceStep::Reached(id) => break (SolveStatus::Solved, Some(original.path_to(id))),
                RaceStep::Exhausted => break (SolveStatus::Unsolvable, None),
                RaceStep::Expanded => {}
            }

            if twin_exhausted {
                continue;
            }
            match twin.step() {
                RaceStep::Reached(_) => break (SolveStatus::Unsolvable, None),
                RaceStep::Exhausted => twin_exhausted = true,
                RaceStep::Expanded => {}
            }
        };

        let stats = RaceStats {
            original: original.stats,
            twin: twin.stats,
        };
        tracing::debug!(
            ?status,
            moves = ?path.as_ref().map(|p| p.len() - 1),
            original_expanded = stats.original.expanded,
            twin_expanded = stats.twin.expanded,
            original_frontier = original.frontier.len(),
            twin_frontier = twin.frontier.len(),
            "race finished"
        );

        Ok(Self {
            initial,
            status,
            path,
            stats,
        })
    }

    /// Runs a solve and returns only its outcome.
    pub fn solve(
        initial: impl Into<Option<PuzzleState>>,
    ) -> Result<SolveOutcome, InvalidInitialState> {
        Ok(Self::new(initial)?.into_outcome())
    }

    pub fn solve_with(
        initial: impl Into<Option<PuzzleState>>,
        options: SolveOptions,
    ) -> Result<SolveOutcome, InvalidInitialState> {
        Ok(Self::with_options(initial, options)?.into_outcome())
    }

    pub fn initial(&self) -> &PuzzleState {
        &self.initial
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_solvable(&self) -> bool {
        self.status == SolveStatus::Solved
    }

    /// Minimum number of slides to the goal; `None` when unsolvable.
    pub fn move_count(&self) -> Option<u32> {
        self.path.as_ref().map(|p| (p.len() - 1) as u32)
    }

    /// Minimum number of slides, or -1 when unsolvable.
    pub fn moves(&self) -> i64 {
        self.move_count().map_or(-1, i64::from)
    }

    /// A shortest sequence of states from the initial state to the goal.
    pub fn solution(&self) -> Option<&[PuzzleState]> {
        self.path.as_deref()
    }

    pub fn stats(&self) -> RaceStats {
        self.stats
    }

    pub fn into_outcome(self) -> SolveOutcome {
        SolveOutcome {
            is_solvable: self.is_solvable(),
            move_count: self.move_count(),
            path: self.path,
        }
    }
}
