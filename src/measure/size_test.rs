use super::*;
use crate::geom::Bounds;

fn boxed(index: u64, left: f64, top: f64, width: f64, height: f64) -> Node {
    Node::new(index, Bounds::new(left, top, width, height))
}

fn label(index: u64, multiline: bool) -> Node {
    Node::text(index, Bounds::new(0.0, 0.0, 120.0, 40.0), "Some words", multiline)
}

fn row(children: Vec<Node>) -> Node {
    Node::container(1, Bounds::new(0.0, 0.0, 400.0, 100.0), Direction::Row, children)
}

fn resolved(mut node: Node, options: &ConvertOptions) -> Node {
    resolve(&mut node, options);
    node
}

// =============================================================
// Bottom-up
// =============================================================

#[test]
fn leaf_box_is_fixed() {
    let node = resolved(row(vec![boxed(2, 0.0, 0.0, 50.0, 50.0)]), &ConvertOptions::default());
    let leaf = &node.children[0];
    assert_eq!((leaf.width_spec, leaf.height_spec), (SizeSpec::Fixed, SizeSpec::Fixed));
}

#[test]
fn text_follows_content_and_multiline_option() {
    let node = resolved(row(vec![label(2, false), label(3, true)]), &ConvertOptions::default());
    assert_eq!((node.children[0].width_spec, node.children[0].height_spec), (SizeSpec::Auto, SizeSpec::Auto));
    assert_eq!((node.children[1].width_spec, node.children[1].height_spec), (SizeSpec::Fixed, SizeSpec::Auto));

    let options = ConvertOptions { multiline_text_fixed_width: false, ..ConvertOptions::default() };
    let node = resolved(row(vec![label(3, true)]), &options);
    assert_eq!(node.children[0].width_spec, SizeSpec::Auto);
}

#[test]
fn hints_are_kept() {
    let hinted = label(2, false).with_specs(SizeSpec::Fixed, SizeSpec::Unknown);
    let node = resolved(row(vec![hinted]), &ConvertOptions::default());
    assert_eq!(node.children[0].width_spec, SizeSpec::Fixed);
    assert_eq!(node.children[0].height_spec, SizeSpec::Auto);
}

#[test]
fn row_is_auto_wide_and_fixed_tall_over_fixed_children() {
    let node = resolved(
        row(vec![boxed(2, 0.0, 0.0, 50.0, 50.0), boxed(3, 60.0, 0.0, 50.0, 50.0)]),
        &ConvertOptions::default(),
    );
    assert_eq!((node.width_spec, node.height_spec), (SizeSpec::Auto, SizeSpec::Fixed));
}

#[test]
fn row_height_follows_an_auto_child() {
    let node = resolved(row(vec![boxed(2, 0.0, 0.0, 50.0, 50.0), label(3, false)]), &ConvertOptions::default());
    assert_eq!(node.height_spec, SizeSpec::Auto);
}

#[test]
fn column_rules_mirror_row_rules() {
    let column = Node::container(
        1,
        Bounds::new(0.0, 0.0, 200.0, 300.0),
        Direction::Column,
        vec![boxed(2, 0.0, 0.0, 200.0, 50.0), label(3, false)],
    );
    let node = resolved(column, &ConvertOptions::default());
    assert_eq!((node.width_spec, node.height_spec), (SizeSpec::Auto, SizeSpec::Auto));

    let column = Node::container(
        1,
        Bounds::new(0.0, 0.0, 200.0, 300.0),
        Direction::Column,
        vec![boxed(2, 0.0, 0.0, 200.0, 50.0)],
    );
    let node = resolved(column, &ConvertOptions::default());
    assert_eq!((node.width_spec, node.height_spec), (SizeSpec::Fixed, SizeSpec::Auto));
}

#[test]
fn page_root_fills_viewport_when_enabled() {
    let page = row(vec![boxed(2, 0.0, 0.0, 50.0, 50.0)]).with_role(Role::Page);

    let node = resolved(page.clone(), &ConvertOptions::default());
    assert_eq!(node.width_spec, SizeSpec::Constrained);

    let options = ConvertOptions { page_fills_viewport: false, ..ConvertOptions::default() };
    let node = resolved(page, &options);
    assert_eq!(node.width_spec, SizeSpec::Auto);
}

#[test]
fn wrapped_list_gets_a_definite_width() {
    let list = row(vec![boxed(2, 0.0, 0.0, 50.0, 50.0), boxed(3, 60.0, 0.0, 50.0, 50.0)]).with_role(Role::ListWrap);
    let node = resolved(list, &ConvertOptions::default());
    assert_eq!(node.width_spec, SizeSpec::Fixed);
}

#[test]
fn overlays_are_resolved_too() {
    let mut node = row(vec![boxed(2, 0.0, 0.0, 50.0, 50.0)]);
    node.attach_nodes.push(boxed(9, 390.0, -5.0, 20.0, 20.0));
    let node = resolved(node, &ConvertOptions::default());
    assert_eq!(node.attach_nodes[0].width_spec, SizeSpec::Fixed);
}

// =============================================================
// Validation
// =============================================================

#[test]
fn unknown_spec_is_fatal() {
    let node = row(vec![boxed(2, 0.0, 0.0, 50.0, 50.0)]).with_specs(SizeSpec::Auto, SizeSpec::Fixed);
    let err = validate(&node).unwrap_err();
    assert!(matches!(err, ConvertError::UnresolvedSpec { index: 2, axis: Axis::X }));
}

#[test]
fn resolved_tree_validates() {
    let node = resolved(row(vec![boxed(2, 0.0, 0.0, 50.0, 50.0), label(3, true)]), &ConvertOptions::default());
    assert!(validate(&node).is_ok());
}

// =============================================================
// Top-down
// =============================================================

#[test]
fn stretched_row_promotes_auto_children() {
    let children = vec![
        label(2, false).with_specs(SizeSpec::Auto, SizeSpec::Auto),
        boxed(3, 200.0, 0.0, 50.0, 50.0).with_specs(SizeSpec::Fixed, SizeSpec::Fixed),
    ];
    let mut node = row(children).with_specs(SizeSpec::Constrained, SizeSpec::Constrained);

    promote(&mut node);

    assert_eq!(node.children[0].width_spec, SizeSpec::Constrained);
    assert_eq!(node.children[0].height_spec, SizeSpec::Constrained);
    assert_eq!(node.children[1].width_spec, SizeSpec::Fixed);
}

#[test]
fn content_sized_row_promotes_nothing() {
    let mut node = row(vec![label(2, false).with_specs(SizeSpec::Auto, SizeSpec::Auto)])
        .with_specs(SizeSpec::Auto, SizeSpec::Fixed);
    promote(&mut node);
    assert_eq!(node.children[0].width_spec, SizeSpec::Auto);
    assert_eq!(node.children[0].height_spec, SizeSpec::Auto);
}

// =============================================================
// Tokens
// =============================================================

#[test]
fn fixed_axes_emit_sizes() {
    let mut node = boxed(2, 0.0, 0.0, 120.5, 48.0).with_specs(SizeSpec::Fixed, SizeSpec::Auto);
    emit_tokens(&mut node, Direction::Unset);
    assert_eq!(node.class_list, vec![ClassToken::length(Property::Width, Side::All, 120.5)]);
}

#[test]
fn main_axis_stretch_emits_flex_one_once() {
    let mut node = boxed(2, 0.0, 0.0, 10.0, 10.0).with_specs(SizeSpec::Constrained, SizeSpec::Auto);
    node.push_class(ClassToken::Flex1);
    emit_tokens(&mut node, Direction::Row);
    assert_eq!(node.class_list, vec![ClassToken::Flex1]);

    let mut node = boxed(3, 0.0, 0.0, 10.0, 10.0).with_specs(SizeSpec::Constrained, SizeSpec::Auto);
    emit_tokens(&mut node, Direction::Column);
    assert!(node.class_list.is_empty());
}
