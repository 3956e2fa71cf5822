//! Tree model: lookups and value-semantics mutations.

use rstest::{fixture, rstest};

use dragtree::domain::{Color, DomainError, ItemId, ItemPatch, Parent, Tree, TreeItem};

fn id(s: &str) -> ItemId {
    ItemId::from(s)
}

/// a, b > (b1 > b1x, b2), c
#[fixture]
fn tree() -> Tree {
    Tree::new(vec![
        TreeItem::new("a", "A"),
        TreeItem::new("b", "B").opened().with_children(vec![
            TreeItem::new("b1", "B1").with_children(vec![TreeItem::new("b1x", "B1x")]),
            TreeItem::new("b2", "B2"),
        ]),
        TreeItem::new("c", "C"),
    ])
}

#[rstest]
#[case("a", vec![])]
#[case("b1", vec!["b"])]
#[case("b1x", vec!["b", "b1"])]
fn given_item_when_getting_path_then_lists_ancestors_top_down(
    tree: Tree,
    #[case] item: &str,
    #[case] expected: Vec<&str>,
) {
    // Act
    let path = tree.path_to(&id(item)).unwrap();

    // Assert
    let expected: Vec<ItemId> = expected.into_iter().map(id).collect();
    assert_eq!(path, expected);
}

#[rstest]
fn given_unknown_item_when_getting_path_then_none(tree: Tree) {
    assert_eq!(tree.path_to(&id("zzz")), None);
}

#[rstest]
fn given_root_and_item_parents_when_listing_children_then_returns_direct_children(tree: Tree) {
    // Act
    let top: Vec<&str> = tree
        .children_of(&Parent::Root)
        .unwrap()
        .iter()
        .map(|i| i.id.as_str())
        .collect();
    let under_b: Vec<&str> = tree
        .children_of(&Parent::from("b"))
        .unwrap()
        .iter()
        .map(|i| i.id.as_str())
        .collect();

    // Assert
    assert_eq!(top, vec!["a", "b", "c"]);
    assert_eq!(under_b, vec!["b1", "b2"]);
    assert!(tree.children_of(&Parent::from("zzz")).is_none());
}

#[rstest]
#[case("a")]
#[case("b")]
#[case("b1x")]
fn given_any_item_when_checking_self_descent_then_false(tree: Tree, #[case] item: &str) {
    assert!(!tree.is_descendant(&id(item), &id(item)));
}

#[rstest]
fn given_nested_items_when_checking_descent_then_only_subtree_matches(tree: Tree) {
    assert!(tree.is_descendant(&id("b"), &id("b1")));
    assert!(tree.is_descendant(&id("b"), &id("b1x")));
    assert!(!tree.is_descendant(&id("b1"), &id("b")));
    assert!(!tree.is_descendant(&id("a"), &id("b1")));
}

#[rstest]
#[case("a")]
#[case("b")]
#[case("b1")]
#[case("b1x")]
#[case("b2")]
#[case("c")]
fn given_item_when_removing_and_reinserting_at_origin_then_tree_is_identical(
    tree: Tree,
    #[case] item: &str,
) {
    // Arrange
    let (parent, index) = tree.position_of(&id(item)).unwrap();

    // Act
    let (detached, removed) = tree.remove_by_id(&id(item)).unwrap();
    let restored = detached.insert_at(&parent, index, removed).unwrap();

    // Assert
    assert_eq!(restored, tree);
}

#[rstest]
fn given_original_tree_when_mutating_then_original_is_untouched(tree: Tree) {
    // Arrange
    let before = tree.clone();

    // Act
    let _ = tree.delete_by_id(&id("b")).unwrap();
    let _ = tree.set_open(&id("b"), false).unwrap();
    let _ = tree
        .insert_at(&Parent::Root, 0, TreeItem::new("n", "N"))
        .unwrap();

    // Assert
    assert_eq!(tree, before);
}

#[rstest]
fn given_index_past_end_when_inserting_then_appends(tree: Tree) {
    // Act
    let next = tree
        .insert_at(&Parent::from("b"), 99, TreeItem::new("n", "N"))
        .unwrap();

    // Assert
    let ids: Vec<&str> = next
        .children_of(&Parent::from("b"))
        .unwrap()
        .iter()
        .map(|i| i.id.as_str())
        .collect();
    assert_eq!(ids, vec!["b1", "b2", "n"]);
}

#[rstest]
fn given_missing_parent_when_inserting_then_parent_not_found(tree: Tree) {
    let err = tree
        .insert_at(&Parent::from("zzz"), 0, TreeItem::new("n", "N"))
        .unwrap_err();
    assert_eq!(err, DomainError::ParentNotFound(Parent::from("zzz")));
}

#[rstest]
fn given_subtree_when_deleting_then_descendants_are_gone(tree: Tree) {
    // Act
    let next = tree.delete_by_id(&id("b")).unwrap();

    // Assert
    for gone in ["b", "b1", "b1x", "b2"] {
        assert!(!next.contains(&id(gone)), "{gone} should be deleted");
    }
    assert_eq!(next.len(), 2);
}

#[rstest]
fn given_patch_when_updating_then_only_label_and_color_change(tree: Tree) {
    // Arrange
    let patch = ItemPatch {
        label: "Renamed".into(),
        color: Color::Red,
    };

    // Act
    let next = tree.update_by_id(&id("b"), &patch).unwrap();

    // Assert
    let b = next.find(&id("b")).unwrap();
    assert_eq!(b.label, "Renamed");
    assert_eq!(b.color, Color::Red);
    assert_eq!(b.children, tree.find(&id("b")).unwrap().children);
    assert!(b.is_open);
    assert_eq!(next.position_of(&id("b")), tree.position_of(&id("b")));
}

#[rstest]
fn given_unknown_item_when_updating_then_item_not_found(tree: Tree) {
    let patch = ItemPatch {
        label: "x".into(),
        color: Color::Gray,
    };
    assert_eq!(
        tree.update_by_id(&id("zzz"), &patch).unwrap_err(),
        DomainError::ItemNotFound(id("zzz"))
    );
}

#[test]
fn given_duplicate_nested_ids_when_checking_uniqueness_then_reports_duplicate() {
    // Arrange
    let tree = Tree::new(vec![
        TreeItem::new("x", "X").with_children(vec![TreeItem::new("y", "Y")]),
        TreeItem::new("y", "Y again"),
    ]);

    // Act / Assert
    assert_eq!(
        tree.check_unique_ids().unwrap_err(),
        DomainError::DuplicateId(id("y"))
    );
}
