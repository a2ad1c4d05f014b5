use super::*;
use crate::config::ConvertOptions;
use crate::node::{IdGen, Role};

fn ctx() -> Context {
    Context::new(ConvertOptions::default(), IdGen::starting_at(1000))
}

fn boxed(index: u64, left: f64, top: f64, width: f64, height: f64) -> Node {
    Node::new(index, Bounds::new(left, top, width, height))
}

fn indices(nodes: &[Node]) -> Vec<u64> {
    nodes.iter().map(|n| n.index).collect()
}

fn parent() -> Node {
    boxed(1, 0.0, 0.0, 400.0, 400.0)
}

#[test]
fn side_by_side_boxes_form_a_row() {
    let mut parent = parent();
    let nodes = vec![
        boxed(4, 220.0, 0.0, 100.0, 50.0),
        boxed(2, 0.0, 0.0, 100.0, 50.0),
        boxed(3, 110.0, 0.0, 100.0, 50.0),
    ];
    arrange(&mut parent, nodes, &mut ctx()).unwrap();

    assert_eq!(parent.direction, Direction::Row);
    assert_eq!(indices(&parent.children), vec![2, 3, 4]);
}

#[test]
fn stacked_boxes_form_a_column() {
    let mut parent = parent();
    let nodes = vec![
        boxed(2, 0.0, 0.0, 200.0, 40.0),
        boxed(3, 0.0, 50.0, 200.0, 30.0),
        boxed(4, 0.0, 100.0, 200.0, 60.0),
    ];
    arrange(&mut parent, nodes, &mut ctx()).unwrap();

    assert_eq!(parent.direction, Direction::Column);
    assert_eq!(indices(&parent.children), vec![2, 3, 4]);
}

#[test]
fn sidebar_layout_nests_column_inside_row() {
    let mut parent = parent();
    let nodes = vec![
        boxed(2, 0.0, 0.0, 100.0, 300.0),
        boxed(3, 120.0, 0.0, 280.0, 50.0),
        boxed(4, 120.0, 60.0, 280.0, 240.0),
    ];
    arrange(&mut parent, nodes, &mut ctx()).unwrap();

    assert_eq!(parent.direction, Direction::Row);
    assert_eq!(indices(&parent.children), vec![2, 1000]);
    let column = &parent.children[1];
    assert_eq!(column.direction, Direction::Column);
    assert_eq!(indices(&column.children), vec![3, 4]);
    assert_eq!(column.bounds, Bounds::new(120.0, 0.0, 280.0, 300.0));
}

#[test]
fn nodes_outside_the_band_stack_above_the_row() {
    let mut parent = parent();
    let nodes = vec![
        boxed(2, 0.0, 0.0, 400.0, 50.0),
        boxed(3, 0.0, 60.0, 190.0, 140.0),
        boxed(4, 210.0, 60.0, 190.0, 140.0),
    ];
    arrange(&mut parent, nodes, &mut ctx()).unwrap();

    assert_eq!(parent.direction, Direction::Column);
    assert_eq!(indices(&parent.children), vec![2, 1000]);
    let row = &parent.children[1];
    assert_eq!(row.direction, Direction::Row);
    assert_eq!(indices(&row.children), vec![3, 4]);
    assert_eq!(row.bounds, Bounds::new(0.0, 60.0, 400.0, 140.0));
}

#[test]
fn uniform_column_cluster_becomes_list_y() {
    let mut parent = parent();
    let nodes = vec![
        boxed(2, 0.0, 0.0, 100.0, 300.0),
        boxed(3, 120.0, 0.0, 200.0, 80.0),
        boxed(4, 120.0, 90.0, 200.0, 80.0),
        boxed(5, 120.0, 180.0, 200.0, 80.0),
    ];
    arrange(&mut parent, nodes, &mut ctx()).unwrap();

    assert_eq!(parent.direction, Direction::Row);
    let column = &parent.children[1];
    assert!(column.has_role(Role::ListY));
    assert_eq!(indices(&column.children), vec![3, 4, 5]);
}

#[test]
fn single_node_sets_row() {
    let mut parent = parent();
    arrange(&mut parent, vec![boxed(2, 10.0, 10.0, 50.0, 50.0)], &mut ctx()).unwrap();

    assert_eq!(parent.direction, Direction::Row);
    assert_eq!(indices(&parent.children), vec![2]);
}

#[test]
fn no_nodes_leaves_direction_unset() {
    let mut parent = parent();
    arrange(&mut parent, Vec::new(), &mut ctx()).unwrap();

    assert_eq!(parent.direction, Direction::Unset);
    assert!(parent.children.is_empty());
}

#[test]
fn overlapping_boxes_fall_back_to_a_stack() {
    let mut parent = parent();
    let mut ctx = ctx();
    let nodes = vec![boxed(2, 0.0, 0.0, 100.0, 100.0), boxed(3, 50.0, 20.0, 100.0, 60.0)];
    arrange(&mut parent, nodes, &mut ctx).unwrap();

    assert_eq!(parent.direction, Direction::Column);
    assert_eq!(indices(&parent.children), vec![2, 3]);
    assert_eq!(ctx.diagnostics().len(), 1);
    assert_eq!(ctx.diagnostics()[0].stage, Stage::DirectionGrouper);
}

#[test]
fn tallest_tie_picks_earliest() {
    let nodes = vec![boxed(7, 0.0, 0.0, 10.0, 50.0), boxed(3, 20.0, 0.0, 10.0, 50.0)];
    assert_eq!(tallest(&nodes), Some(0));
    assert_eq!(tallest(&[]), None);
}
