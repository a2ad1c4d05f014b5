use serde_json::json;

use super::*;

fn leaf(index: u64) -> Node {
    Node::new(index, Bounds::new(0.0, 0.0, 10.0, 10.0))
}

// =============================================================
// Serde
// =============================================================

#[test]
fn minimal_node_deserializes_with_defaults() {
    let node: Node = serde_json::from_value(json!({
        "bounds": { "left": 0, "top": 0, "width": 20, "height": 10 }
    }))
    .unwrap();

    assert_eq!(node.index, 0);
    assert_eq!((node.width_spec, node.height_spec), (SizeSpec::Unknown, SizeSpec::Unknown));
    assert_eq!(node.direction, Direction::Unset);
    assert!(node.roles.is_empty());
    assert!(node.children.is_empty() && node.attach_nodes.is_empty());
    assert!(!node.spacer);
}

#[test]
fn roles_are_kebab_case_and_sorted() {
    let node = leaf(1).with_role(Role::ListItem).with_role(Role::Btn).with_role(Role::ListWrap);
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["role"], json!(["list-wrap", "list-item", "btn"]));
}

#[test]
fn empty_collections_are_omitted() {
    let value = serde_json::to_value(leaf(1)).unwrap();
    let object = value.as_object().unwrap();
    for key in ["role", "children", "attach_nodes", "class_list", "text", "spacer", "attrs", "name"] {
        assert!(!object.contains_key(key), "{key} should be skipped");
    }
}

#[test]
fn class_tokens_are_tagged_by_kind() {
    let tokens = vec![
        ClassToken::FlexCol,
        ClassToken::Flex1,
        ClassToken::SelfAlign { align: Align::End },
        ClassToken::length(Property::Gap, Side::X, 12.0),
    ];
    assert_eq!(
        serde_json::to_value(&tokens).unwrap(),
        json!([
            { "kind": "flex-col" },
            { "kind": "flex-1" },
            { "kind": "self-align", "align": "end" },
            { "kind": "length", "property": "gap", "side": "x", "px": 12.0 }
        ])
    );
}

#[test]
fn text_body_accepts_literal_or_runs() {
    let literal: Text = serde_json::from_value(json!({ "body": "Hi" })).unwrap();
    assert_eq!(literal.body, TextBody::Literal("Hi".into()));
    assert!(!literal.multiline);

    let runs: Text = serde_json::from_value(json!({
        "body": [{ "text": "Bold", "style": { "weight": 700 } }, { "text": " plain" }],
        "multiline": true
    }))
    .unwrap();
    let TextBody::Runs(runs_body) = &runs.body else {
        panic!("expected runs, got {:?}", runs.body);
    };
    assert_eq!(runs_body.len(), 2);
    assert_eq!(runs_body[0].style["weight"], json!(700));
    assert!(runs.multiline);
}

#[test]
fn attrs_pass_through_untouched() {
    let node: Node = serde_json::from_value(json!({
        "index": 3,
        "bounds": { "left": 0, "top": 0, "width": 1, "height": 1 },
        "attrs": { "fill": "#fff", "radius": [4, 4, 0, 0] }
    }))
    .unwrap();
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["attrs"], json!({ "fill": "#fff", "radius": [4, 4, 0, 0] }));
}

// =============================================================
// Tokens
// =============================================================

#[test]
fn lengths_round_to_hundredths() {
    assert_eq!(
        ClassToken::length(Property::Margin, Side::Top, 3.14159),
        ClassToken::Length { property: Property::Margin, side: Side::Top, px: 3.14 }
    );
}

#[test]
fn round_px_folds_negative_zero() {
    let px = round_px(-0.001);
    assert_eq!(px, 0.0);
    assert!(px.is_sign_positive());
}

#[test]
fn push_length_skips_sub_pixel_values() {
    let mut node = leaf(1);
    node.push_length(Property::Padding, Side::Left, 0.4);
    node.push_length(Property::Padding, Side::Left, -0.2);
    assert!(node.class_list.is_empty());

    node.push_length(Property::Padding, Side::Left, -6.0);
    assert_eq!(node.class_list, vec![ClassToken::length(Property::Padding, Side::Left, -6.0)]);
}

#[test]
fn merge_classes_keeps_order_and_drops_duplicates() {
    let mut node = leaf(1);
    node.push_class(ClassToken::Flex);
    node.push_class(ClassToken::Relative);
    node.merge_classes(vec![ClassToken::Relative, ClassToken::FlexCol, ClassToken::Flex]);
    assert_eq!(node.class_list, vec![ClassToken::Flex, ClassToken::Relative, ClassToken::FlexCol]);
}

#[test]
fn side_helpers_pick_axis_sides() {
    assert_eq!((Side::start(Axis::X), Side::end(Axis::X)), (Side::Left, Side::Right));
    assert_eq!((Side::start(Axis::Y), Side::end(Axis::Y)), (Side::Top, Side::Bottom));
    assert_eq!(Side::both(Axis::Y), Side::Y);
}

// =============================================================
// Model helpers
// =============================================================

#[test]
fn spec_accessors_follow_axis() {
    let mut node = leaf(1);
    node.set_spec(Axis::Y, SizeSpec::Auto);
    assert_eq!(node.spec(Axis::Y), SizeSpec::Auto);
    assert_eq!(node.spec(Axis::X), SizeSpec::Unknown);
    assert!(!node.spec(Axis::X).is_resolved());
    assert_eq!(Direction::Column.main_axis(), Some(Axis::Y));
    assert_eq!(Direction::Unset.main_axis(), None);
}

#[test]
fn role_set_operations() {
    let mut roles: RoleSet = [Role::Page, Role::ListY].into_iter().collect();
    assert!(roles.is_list());
    assert!(roles.remove(Role::ListY));
    assert!(!roles.is_list());
    assert!(!roles.insert(Role::Page));

    roles.extend(&[Role::Tab].into_iter().collect());
    assert_eq!(roles.iter().collect::<Vec<_>>(), vec![Role::Page, Role::Tab]);
}

#[test]
fn max_index_sees_overlays() {
    let mut root = leaf(1).with_children(vec![leaf(4), leaf(2)]);
    root.children[1].attach_nodes.push(leaf(9));
    assert_eq!(root.max_index(), 9);

    let mut visited = Vec::new();
    root.visit(&mut |n| visited.push(n.index));
    assert_eq!(visited, vec![1, 4, 2, 9]);
}

#[test]
fn id_gen_continues_after_input() {
    let root = leaf(3).with_children(vec![leaf(7)]);
    let mut ids = IdGen::after(&root).unwrap();
    assert_eq!(ids.peek(), 8);
    assert_eq!(ids.fresh(), 8);
    assert_eq!(ids.fresh(), 9);
    assert_eq!(ids.peek(), 10);
}

#[test]
fn text_constructor_marks_leaf() {
    let node = Node::text(1, Bounds::new(0.0, 0.0, 10.0, 10.0), "x", true).with_name("caption");
    assert!(node.is_text());
    assert!(node.is_multiline_text());
    assert_eq!(node.name.as_deref(), Some("caption"));
    assert!(!leaf(2).is_text());
}

#[test]
fn id_gen_refuses_to_wrap() {
    let root = leaf(u64::MAX);
    assert!(matches!(IdGen::after(&root), Err(ConvertError::IndexOverflow { index: u64::MAX })));

    let mut ids = IdGen::starting_at(u64::MAX);
    assert_eq!(ids.fresh(), u64::MAX);
    assert_eq!(ids.peek(), u64::MAX);
}
