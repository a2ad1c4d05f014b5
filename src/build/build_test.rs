use super::*;
use crate::config::ConvertOptions;
use crate::geom::Bounds;
use crate::node::{Direction, IdGen, Role};

fn ctx() -> Context {
    Context::new(ConvertOptions::default(), IdGen::starting_at(1000))
}

fn boxed(index: u64, left: f64, top: f64, width: f64, height: f64) -> Node {
    Node::new(index, Bounds::new(left, top, width, height))
}

fn indices(nodes: &[Node]) -> Vec<u64> {
    nodes.iter().map(|n| n.index).collect()
}

// =============================================================
// Reading order
// =============================================================

#[test]
fn reading_order_groups_lines_within_tolerance() {
    let mut nodes = vec![
        boxed(1, 200.0, 1.0, 50.0, 20.0),
        boxed(2, 0.0, 60.0, 50.0, 20.0),
        boxed(3, 100.0, 0.0, 50.0, 20.0),
        boxed(4, 0.0, 2.0, 50.0, 20.0),
    ];
    reading_order(&mut nodes, Tolerance::default());
    assert_eq!(indices(&nodes), vec![4, 3, 1, 2]);
}

#[test]
fn reading_order_breaks_position_ties_on_index() {
    let mut nodes = vec![boxed(9, 0.0, 0.0, 50.0, 20.0), boxed(3, 0.0, 0.0, 50.0, 20.0)];
    reading_order(&mut nodes, Tolerance::default());
    assert_eq!(indices(&nodes), vec![3, 9]);
}

// =============================================================
// Root validation
// =============================================================

#[test]
fn text_root_is_rejected() {
    let root = Node::text(1, Bounds::new(0.0, 0.0, 100.0, 20.0), "hello", false);
    let err = build(root, &mut ctx()).unwrap_err();
    assert!(matches!(err, ConvertError::RootNotContainer { index: 1 }));
}

#[test]
fn empty_root_is_rejected() {
    let err = build(boxed(1, 0.0, 0.0, 100.0, 100.0), &mut ctx()).unwrap_err();
    assert!(matches!(err, ConvertError::RootNotContainer { index: 1 }));
}

#[test]
fn zero_area_root_is_rejected() {
    let root = boxed(1, 0.0, 0.0, 100.0, 0.0).with_children(vec![boxed(2, 0.0, 0.0, 10.0, 0.0)]);
    let err = build(root, &mut ctx()).unwrap_err();
    assert!(matches!(err, ConvertError::DegenerateBounds { index: 1 }));
}

// =============================================================
// Full build
// =============================================================

#[test]
fn flat_design_becomes_nested_tree() {
    let root = boxed(1, 0.0, 0.0, 400.0, 300.0).with_children(vec![
        boxed(2, 0.0, 0.0, 400.0, 100.0),
        boxed(3, 10.0, 10.0, 40.0, 40.0),
        Node::text(4, Bounds::new(60.0, 20.0, 200.0, 20.0), "Title", false),
        boxed(5, 0.0, 150.0, 100.0, 100.0),
        boxed(6, 110.0, 150.0, 100.0, 100.0),
        boxed(7, 220.0, 150.0, 100.0, 100.0),
    ]);
    let root = build(root, &mut ctx()).unwrap();

    assert_eq!(root.direction, Direction::Column);
    assert_eq!(indices(&root.children), vec![2, 1000]);

    let card = &root.children[0];
    assert_eq!(card.direction, Direction::Row);
    assert_eq!(indices(&card.children), vec![3, 4]);

    let list = &root.children[1];
    assert!(list.has_role(Role::ListX));
    assert_eq!(indices(&list.children), vec![5, 6, 7]);
}

#[test]
fn wrapper_matching_root_is_folded_away() {
    let wrapper = boxed(2, 0.0, 0.0, 200.0, 100.0)
        .with_children(vec![boxed(3, 10.0, 10.0, 50.0, 50.0), boxed(4, 100.0, 10.0, 80.0, 40.0)]);
    let root = boxed(1, 0.0, 0.0, 200.0, 100.0).with_children(vec![wrapper]);

    let root = build(root, &mut ctx()).unwrap();

    assert_eq!(root.index, 1);
    assert_eq!(root.direction, Direction::Row);
    assert_eq!(indices(&root.children), vec![3, 4]);
}

#[test]
fn overlays_are_built_and_kept_out_of_flow() {
    let root = boxed(1, 0.0, 0.0, 400.0, 400.0).with_children(vec![
        boxed(2, 10.0, 10.0, 100.0, 100.0),
        boxed(3, 200.0, 10.0, 150.0, 80.0),
        boxed(4, 90.0, 0.0, 30.0, 30.0),
    ]);
    let root = build(root, &mut ctx()).unwrap();

    assert_eq!(indices(&root.children), vec![2, 3]);
    assert_eq!(indices(&root.children[0].attach_nodes), vec![4]);
    assert!(root.attach_nodes.is_empty());
}
