//! Tour engine: greedy nearest-attachment tree, pre-order tour, step reveal.
//!
//! The engine is synchronous and owns all of its state. Every public
//! operation runs to completion before returning, so a caller that
//! serializes calls (an event loop, or a mutex around the engine) never
//! observes a half-applied step.
//!
//! Lifecycle, as reported by [`TourEngine::phase`]:
//!
//! ```text
//! Empty --add--> Growing --step (all attached)--> Touring --step (closing edge)--> Complete
//!                  ^  |                                                               |
//!                  +--+ step (attach nearest)                  add --> Growing <------+
//! ```

use std::collections::HashSet;
use std::fmt;

use itertools::{iproduct, Itertools};
use rand::Rng;
use tracing::{debug, info, instrument, trace, warn};

use crate::domain::arena::{PointArena, PointId, TreeLinks};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::history::{Action, ActionLog};
use crate::domain::listener::CompletionListener;
use crate::domain::point::{distance, Point};
use crate::domain::region::Region;

/// Rejection-sampling budget per requested random point.
pub const DEFAULT_ATTEMPTS_PER_POINT: u32 = 100;

/// Coarse engine state, derived from the underlying structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No points
    Empty,
    /// Points exist, tree construction not finished
    Growing,
    /// Tree complete, tour edges being revealed
    Touring,
    /// Whole cycle revealed and its cost reported
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Empty => "empty",
            Phase::Growing => "growing",
            Phase::Touring => "touring",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Outcome of a single [`TourEngine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// One more point attached to the tree
    GrowingStepped {
        parent: Point,
        child: Point,
        distance: u64,
    },
    /// Next tour edge revealed
    TourRevealed { from: Point, to: Point, distance: u64 },
    /// Closing edge revealed, total cost of the cycle
    CycleCompleted { cost: u64 },
    /// Nothing to do (no points, or cycle already complete)
    NoOp,
}

impl StepResult {
    /// True when further steps will not change anything until the point set
    /// changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepResult::CycleCompleted { .. } | StepResult::NoOp)
    }
}

/// Line between two points with its truncated length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub distance: u64,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            distance: distance(from, to),
        }
    }
}

/// Immutable view of the engine for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    /// Point set in insertion order
    pub points: Vec<Point>,
    pub start: Option<Point>,
    /// Tree links (parent to child) in attachment order
    pub tree_edges: Vec<Segment>,
    /// Levels in the attachment tree, 0 when nothing is attached
    pub tree_depth: usize,
    /// Attached points without children
    pub tree_leaves: usize,
    /// Pre-order tour, empty until construction finishes
    pub tour: Vec<Point>,
    /// Number of tour edges revealed so far
    pub cursor: usize,
}

impl Snapshot {
    /// Every unordered point pair with its distance (the complete graph).
    pub fn all_edges(&self) -> Vec<Segment> {
        self.points
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| Segment::new(a, b))
            .collect()
    }

    /// Tour edges revealed so far; the full cycle once complete.
    pub fn revealed_edges(&self) -> Vec<Segment> {
        let open: Vec<Segment> = self
            .tour
            .iter()
            .tuple_windows()
            .map(|(&a, &b)| Segment::new(a, b))
            .collect();
        match (self.phase, self.start, self.tour.last()) {
            (Phase::Complete, Some(start), Some(&last)) => {
                let mut cycle = open;
                cycle.push(Segment::new(last, start));
                cycle
            }
            _ => open.into_iter().take(self.cursor).collect(),
        }
    }
}

/// Result of a random generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    pub requested: usize,
    pub generated: usize,
}

impl Generation {
    pub fn is_partial(&self) -> bool {
        self.generated < self.requested
    }
}

#[derive(Debug, Clone, Copy)]
struct Attachment {
    parent: PointId,
    child: PointId,
    distance: u64,
}

/// Greedy tour builder over a growing point set.
pub struct TourEngine {
    points: PointArena,
    tree: TreeLinks,
    tour: Vec<PointId>,
    cursor: usize,
    cost: u64,
    /// Tour built and being revealed
    touring: bool,
    /// Cycle revealed, nothing left until the point set changes
    completed: bool,
    history: ActionLog,
    attempts_per_point: u32,
    listener: Option<Box<dyn CompletionListener>>,
}

impl Default for TourEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TourEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourEngine")
            .field("phase", &self.phase())
            .field("points", &self.points.len())
            .field("attached", &self.tree.len())
            .field("cursor", &self.cursor)
            .field("cost", &self.cost)
            .field("history", &self.history.len())
            .finish()
    }
}

impl TourEngine {
    pub fn new() -> Self {
        Self {
            points: PointArena::new(),
            tree: TreeLinks::new(),
            tour: Vec::new(),
            cursor: 0,
            cost: 0,
            touring: false,
            completed: false,
            history: ActionLog::new(),
            attempts_per_point: DEFAULT_ATTEMPTS_PER_POINT,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn CompletionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn with_attempts_per_point(mut self, attempts: u32) -> Self {
        self.attempts_per_point = attempts;
        self
    }

    // ------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------

    /// Adds a point. No bounds or duplicate checks at this layer.
    #[instrument(level = "debug", skip(self))]
    pub fn add_point(&mut self, x: i32, y: i32) {
        self.insert_point(Point::new(x, y));
    }

    fn insert_point(&mut self, point: Point) -> PointId {
        let id = self.points.insert(point);
        self.history.push(Action::AddPoint);
        if self.points.len() == 1 && self.tree.is_empty() {
            // the first point is the start and counts as attached
            self.tree.set_root(id);
        }
        if self.touring || self.completed {
            debug!("point set changed, discarding tour");
            self.discard_tour();
        }
        self.completed = false;
        id
    }

    /// Advances the engine by one transition.
    #[instrument(level = "debug", skip(self))]
    pub fn step(&mut self) -> StepResult {
        let Some(start) = self.points.first() else {
            debug!("step on empty point set");
            return StepResult::NoOp;
        };
        if self.completed {
            return StepResult::NoOp;
        }
        if !self.tree.contains(start) {
            // tree was discarded by undo
            self.tree.set_root(start);
        }

        if let Some(next) = self.nearest_attachment() {
            self.tree.attach(next.parent, next.child);
            let (parent, child) = (self.resolve(next.parent), self.resolve(next.child));
            debug!(%parent, %child, distance = next.distance, "attached");
            return StepResult::GrowingStepped {
                parent,
                child,
                distance: next.distance,
            };
        }

        if !self.touring {
            self.build_tour();
        }
        self.reveal_next(start)
    }

    /// Reverts the latest point addition and discards all derived structure.
    ///
    /// With an empty history this is a full [`TourEngine::reset`].
    #[instrument(level = "debug", skip(self))]
    pub fn undo(&mut self) {
        if self.history.is_empty() {
            debug!("undo with empty history, resetting");
            self.reset();
            return;
        }
        match self.history.pop() {
            Ok(Action::AddPoint) => {
                if let Some((_, point)) = self.points.pop_last() {
                    debug!(%point, "removed last point");
                }
            }
            Err(err) => {
                debug!(%err, "undo falls back to reset");
                self.reset();
                return;
            }
        }
        self.tree.clear();
        self.discard_tour();
        self.completed = false;
    }

    /// Clears points, tree, tour, history, cursor and cost.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) {
        self.points.clear();
        self.tree.clear();
        self.history.clear();
        self.discard_tour();
        self.completed = false;
    }

    /// Replaces the point set with `count` distinct random points in `region`.
    ///
    /// The request is validated before anything is touched: a non-positive
    /// region or one with fewer distinct coordinates than `count` is
    /// rejected. Sampling stops after `count * attempts_per_point` draws; the
    /// points drawn so far are kept and the report says how many.
    #[instrument(level = "debug", skip(self, rng))]
    pub fn generate_random<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        region: Region,
        rng: &mut R,
    ) -> DomainResult<Generation> {
        region.validate()?;
        let capacity = region.capacity();
        if (count as u64) > capacity {
            return Err(DomainError::RegionTooSmall {
                requested: count,
                capacity,
            });
        }

        self.reset();
        let budget = count
            .saturating_mul(self.attempts_per_point as usize)
            .max(count);
        let mut seen = HashSet::with_capacity(count);
        let mut attempts = 0;

        while seen.len() < count && attempts < budget {
            attempts += 1;
            let point = region.sample(rng);
            if seen.insert(point) {
                self.insert_point(point);
            }
        }

        let generation = Generation {
            requested: count,
            generated: seen.len(),
        };
        if generation.is_partial() {
            warn!(
                requested = count,
                generated = generation.generated,
                attempts,
                "random generation stopped at attempt budget"
            );
        } else {
            debug!(count, attempts, "random points generated");
        }
        Ok(generation)
    }

    // ------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        if self.points.is_empty() {
            Phase::Empty
        } else if self.completed {
            Phase::Complete
        } else if self.touring {
            Phase::Touring
        } else {
            Phase::Growing
        }
    }

    pub fn points(&self) -> &PointArena {
        &self.points
    }

    pub fn tree(&self) -> &TreeLinks {
        &self.tree
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().and_then(|id| self.points.get(id))
    }

    pub fn tour(&self) -> Vec<Point> {
        self.tour.iter().filter_map(|&id| self.points.get(id)).collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cost accumulated by the cycle currently being revealed.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn history(&self) -> &ActionLog {
        &self.history
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase(),
            points: self.points.points().collect(),
            start: self.start(),
            tree_edges: self
                .tree
                .edges()
                .filter_map(|(p, c)| Some(Segment::new(self.points.get(p)?, self.points.get(c)?)))
                .collect(),
            tree_depth: self.tree.depth(),
            tree_leaves: self.tree.leaf_nodes().len(),
            tour: self.tour(),
            cursor: self.cursor,
        }
    }

    // ------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------

    /// Closest (attached, remaining) pair; first found wins ties, scanning
    /// attached in attachment order, then remaining in insertion order.
    fn nearest_attachment(&self) -> Option<Attachment> {
        let remaining: Vec<PointId> = self
            .points
            .ids()
            .iter()
            .copied()
            .filter(|&id| !self.tree.contains(id))
            .collect();
        trace!(
            attached = self.tree.len(),
            remaining = remaining.len(),
            "scanning for nearest attachment"
        );

        iproduct!(self.tree.attached().iter().copied(), remaining)
            .map(|(parent, child)| Attachment {
                parent,
                child,
                distance: distance(self.resolve(parent), self.resolve(child)),
            })
            .min_by_key(|candidate| candidate.distance)
    }

    fn build_tour(&mut self) {
        self.tour = self.tree.iter().collect();
        assert_eq!(
            self.tour.len(),
            self.points.len(),
            "pre-order walk must visit every point exactly once"
        );
        self.cursor = 0;
        self.cost = 0;
        self.touring = true;
        debug!(len = self.tour.len(), "tour built");
    }

    fn reveal_next(&mut self, start: PointId) -> StepResult {
        let last = self.tour.len() - 1;
        if self.cursor < last {
            let from = self.resolve(self.tour[self.cursor]);
            let to = self.resolve(self.tour[self.cursor + 1]);
            let distance = distance(from, to);
            self.cost += distance;
            self.cursor += 1;
            debug!(%from, %to, distance, cursor = self.cursor, "tour edge revealed");
            return StepResult::TourRevealed { from, to, distance };
        }

        let from = self.resolve(self.tour[last]);
        let to = self.resolve(start);
        self.cost += distance(from, to);
        let total = self.cost;
        info!(cost = total, points = self.points.len(), "cycle complete");
        if total > 0 {
            if let Some(listener) = self.listener.as_mut() {
                listener.on_solve_complete(&format!("Cost: {total}"));
            }
        }
        self.cost = 0;
        self.cursor = 0;
        self.touring = false;
        self.completed = true;
        StepResult::CycleCompleted { cost: total }
    }

    fn discard_tour(&mut self) {
        self.tour.clear();
        self.cursor = 0;
        self.cost = 0;
        self.touring = false;
    }

    fn resolve(&self, id: PointId) -> Point {
        match self.points.get(id) {
            Some(point) => point,
            None => panic!("stale point handle {id:?}"),
        }
    }
}
