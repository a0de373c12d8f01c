//! Text rendering of engine state: step lines, tree view, snapshot summary.

use itertools::Itertools;
use termtree::Tree;

use crate::cli::output;
use crate::domain::{PointId, Snapshot, StepResult, TourEngine};

/// Conversion of the attachment tree into a printable `termtree`.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TourEngine {
    fn to_tree_string(&self) -> Tree<String> {
        let tree = self.tree();
        let points = self.points();
        let Some(root) = tree.root() else {
            return Tree::new("Empty tree".to_string());
        };

        fn build(engine: &TourEngine, id: PointId, parent_tree: &mut Tree<String>) {
            let Some(parent) = engine.points().get(id) else {
                return;
            };
            for &child_id in engine.tree().children(id) {
                if let Some(child) = engine.points().get(child_id) {
                    let mut child_tree =
                        Tree::new(format!("{} [{}]", child, parent.distance(&child)));
                    build(engine, child_id, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        let label = points
            .get(root)
            .map(|p| format!("{p} start"))
            .unwrap_or_else(|| "start".to_string());
        let mut view = Tree::new(label);
        build(self, root, &mut view);
        view
    }
}

/// One line describing a step.
pub fn format_step(result: &StepResult) -> String {
    match result {
        StepResult::GrowingStepped {
            parent,
            child,
            distance,
        } => format!("attach {child} to {parent} [{distance}]"),
        StepResult::TourRevealed { from, to, distance } => {
            format!("tour {from} -> {to} [{distance}]")
        }
        StepResult::CycleCompleted { cost } => format!("cycle closed, cost {cost}"),
        StepResult::NoOp => "nothing to do".to_string(),
    }
}

/// Print a step with the matching output style.
pub fn print_step(result: &StepResult) {
    let line = format_step(result);
    match result {
        StepResult::GrowingStepped { .. } => output::grow(&line),
        StepResult::TourRevealed { .. } => output::reveal(&line),
        StepResult::CycleCompleted { .. } => output::action("done", &line),
        StepResult::NoOp => output::detail(&line),
    }
}

/// Print phase, points, tree links and revealed tour.
pub fn print_snapshot(snapshot: &Snapshot) {
    output::header(&format!(
        "{} points, phase {}",
        snapshot.points.len(),
        snapshot.phase
    ));
    if let Some(start) = snapshot.start {
        output::detail(&format!("start: {start}"));
    }
    output::detail(&format!(
        "points: {}",
        snapshot.points.iter().join(" ")
    ));
    output::detail(&format!(
        "tree: {} edges, depth {}, {} leaves, {} total",
        snapshot.tree_edges.len(),
        snapshot.tree_depth,
        snapshot.tree_leaves,
        snapshot.tree_edges.iter().map(|e| e.distance).sum::<u64>()
    ));
    if !snapshot.tour.is_empty() {
        output::detail(&format!("tour: {}", snapshot.tour.iter().join(" -> ")));
    }
    let revealed = snapshot.revealed_edges();
    if !revealed.is_empty() {
        output::detail(&format!(
            "revealed: {} edges, {} so far",
            revealed.len(),
            revealed.iter().map(|e| e.distance).sum::<u64>()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    #[test]
    fn test_tree_view_lists_children_with_distances() {
        let mut engine = TourEngine::new();
        engine.add_point(0, 0);
        engine.add_point(10, 0);
        engine.add_point(0, 10);
        engine.step();
        engine.step();

        let view = engine.to_tree_string().to_string();

        assert!(view.starts_with("(0, 0) start"));
        assert!(view.contains("(10, 0) [10]"));
        assert!(view.contains("(0, 10) [10]"));
    }

    #[test]
    fn test_format_step_lines() {
        let line = format_step(&StepResult::TourRevealed {
            from: Point::new(0, 0),
            to: Point::new(3, 4),
            distance: 5,
        });
        assert_eq!(line, "tour (0, 0) -> (3, 4) [5]");
        assert_eq!(
            format_step(&StepResult::CycleCompleted { cost: 34 }),
            "cycle closed, cost 34"
        );
    }
}
