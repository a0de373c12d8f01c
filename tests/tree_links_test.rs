//! Tests for the point arena and the attachment tree

use rstest::{fixture, rstest};

use tspdraw::domain::{Point, PointArena, PointId, TreeLinks};

/// Arena with five points and a tree:
///
/// ```text
/// a
/// ├── b
/// │   └── d
/// └── c
///     └── e
/// ```
struct Forest {
    arena: PointArena,
    tree: TreeLinks,
    ids: Vec<PointId>,
}

#[fixture]
fn forest() -> Forest {
    let mut arena = PointArena::new();
    let ids: Vec<PointId> = (0..5).map(|i| arena.insert(Point::new(i, i))).collect();
    let (a, b, c, d, e) = (ids[0], ids[1], ids[2], ids[3], ids[4]);

    let mut tree = TreeLinks::new();
    tree.set_root(a);
    tree.attach(a, b);
    tree.attach(a, c);
    tree.attach(b, d);
    tree.attach(c, e);

    Forest { arena, tree, ids }
}

#[rstest]
fn given_tree_when_walking_then_visits_in_pre_order(forest: Forest) {
    let walk: Vec<PointId> = forest.tree.iter().collect();

    let ids = &forest.ids;
    assert_eq!(walk, vec![ids[0], ids[1], ids[3], ids[2], ids[4]]);
}

#[rstest]
fn given_tree_when_listing_edges_then_attachment_order(forest: Forest) {
    let edges: Vec<(PointId, PointId)> = forest.tree.edges().collect();

    let ids = &forest.ids;
    assert_eq!(
        edges,
        vec![(ids[0], ids[1]), (ids[0], ids[2]), (ids[1], ids[3]), (ids[2], ids[4])]
    );
    assert_eq!(edges.len(), forest.tree.len() - 1);
}

#[rstest]
fn given_tree_when_measuring_then_depth_and_leaves(forest: Forest) {
    assert_eq!(forest.tree.depth(), 3);
    assert_eq!(forest.tree.leaf_nodes(), vec![forest.ids[3], forest.ids[4]]);
}

#[rstest]
fn given_tree_when_reading_node_then_parent_is_recorded(forest: Forest) {
    let node = forest.tree.get_node(forest.ids[3]).unwrap();

    assert_eq!(node.parent, Some(forest.ids[1]));
    assert!(node.children.is_empty());
    assert_eq!(forest.tree.get_node(forest.ids[0]).unwrap().parent, None);
}

#[rstest]
#[should_panic(expected = "attached twice")]
fn given_attached_point_when_attaching_again_then_panics(mut forest: Forest) {
    let (a, d) = (forest.ids[0], forest.ids[3]);
    forest.tree.attach(a, d);
}

#[rstest]
#[should_panic(expected = "is not attached")]
fn given_unattached_parent_when_attaching_then_panics(mut forest: Forest) {
    let extra = forest.arena.insert(Point::new(9, 9));
    let other = forest.arena.insert(Point::new(8, 8));
    forest.tree.attach(extra, other);
}

#[rstest]
fn given_arena_when_popping_last_then_insertion_order_shrinks(mut forest: Forest) {
    let (id, point) = forest.arena.pop_last().unwrap();

    assert_eq!(id, forest.ids[4]);
    assert_eq!(point, Point::new(4, 4));
    assert_eq!(forest.arena.len(), 4);
    assert_eq!(forest.arena.get(id), None);
    assert_eq!(forest.arena.first(), Some(forest.ids[0]));
}

#[test]
fn given_empty_tree_when_walking_then_nothing() {
    let tree = TreeLinks::new();

    assert_eq!(tree.iter().count(), 0);
    assert_eq!(tree.depth(), 0);
    assert!(tree.root().is_none());
}
