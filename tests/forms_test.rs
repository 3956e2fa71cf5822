//! Dialog forms: position options, index translation, validation.

use std::time::Duration;

use rstest::{fixture, rstest};

use dragtree::application::services::forms::{
    confirm_remove, parent_options, parse_color, position_options, remove_action, AddForm,
    EditForm, MoveForm,
};
use dragtree::application::services::{Dispatched, TreeStore, TreeView};
use dragtree::application::{ApplicationError, FormError, TreeAction};
use dragtree::domain::{Color, ItemId, Parent, Tree, TreeItem};

fn id(s: &str) -> ItemId {
    ItemId::from(s)
}

#[fixture]
fn flat() -> TreeStore {
    TreeStore::new(Tree::new(vec![
        TreeItem::new("a", "A"),
        TreeItem::new("b", "B"),
        TreeItem::new("c", "C"),
    ]))
}

fn order(store: &TreeStore) -> Vec<&str> {
    store.tree().items().iter().map(|i| i.id.as_str()).collect()
}

#[rstest]
fn given_moving_item_when_listing_positions_then_it_is_not_counted(flat: TreeStore) {
    // Act
    let same_parent = position_options(flat.queries(), &Parent::Root, &id("a")).unwrap();
    let fresh = position_options(flat.queries(), &Parent::Root, &ItemId::generate()).unwrap();

    // Assert
    assert_eq!(same_parent, vec![1, 2, 3]);
    assert_eq!(fresh, vec![1, 2, 3, 4]);
}

#[rstest]
fn given_empty_container_when_listing_positions_then_only_first(flat: TreeStore) {
    let options = position_options(flat.queries(), &Parent::from("b"), &id("a")).unwrap();
    assert_eq!(options, vec![1]);
}

#[rstest]
#[case::first_to_last("a", 3, vec!["b", "c", "a"])]
#[case::last_to_first("c", 1, vec!["c", "a", "b"])]
#[case::first_to_middle("a", 2, vec!["b", "a", "c"])]
#[case::stay_in_place("b", 2, vec!["a", "b", "c"])]
fn given_same_parent_move_when_submitted_then_item_lands_at_chosen_position(
    mut flat: TreeStore,
    #[case] item: &str,
    #[case] position: usize,
    #[case] expected: Vec<&str>,
) {
    // Arrange
    let mut form = MoveForm::new(flat.queries(), id(item)).unwrap();
    form.position = position;

    // Act
    let action = form.into_action(flat.queries()).unwrap();
    flat.dispatch(action).unwrap();

    // Assert
    assert_eq!(order(&flat), expected);
}

#[test]
fn given_move_to_other_parent_when_submitted_then_index_is_position_minus_one() {
    // Arrange
    let store = TreeStore::new(Tree::demo());
    let mut form = MoveForm::new(store.queries(), id("2.1")).unwrap();
    assert_eq!(form.parent, Parent::from("2"));
    form.select_parent(Parent::Root);
    form.position = 2;

    // Act
    let action = form.into_action(store.queries()).unwrap();

    // Assert
    assert_eq!(
        action,
        TreeAction::ModalMove {
            item_id: id("2.1"),
            target_id: Parent::Root,
            index: 1,
        }
    );
}

#[rstest]
fn given_position_out_of_range_when_submitting_move_then_form_error(flat: TreeStore) {
    // Arrange
    let mut form = MoveForm::new(flat.queries(), id("a")).unwrap();
    form.position = 4;

    // Act
    let err = form.into_action(flat.queries()).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ApplicationError::Form(FormError::PositionOutOfRange { position: 4, max: 3 })
    ));
}

#[rstest]
fn given_unknown_item_when_opening_move_form_then_errors(flat: TreeStore) {
    assert!(MoveForm::new(flat.queries(), id("zzz")).is_err());
}

#[rstest]
fn given_parent_options_when_listing_then_first_is_no_parent(flat: TreeStore) {
    let options = parent_options(flat.queries(), &id("a"));
    assert_eq!(options[0].label, "No parent");
    assert!(options.iter().all(|o| o.parent != Parent::from("a")));
}

#[rstest]
fn given_add_form_without_color_when_submitted_then_uses_default_and_first_slot(
    mut flat: TreeStore,
) {
    // Arrange
    let mut form = AddForm::new();
    form.label = "  New  ".into();
    form.select_parent(Parent::from("b"));
    let new_id = form.item_id.clone();

    // Act
    let action = form.into_action(flat.queries(), Color::Lime).unwrap();
    let dispatched = flat.dispatch(action).unwrap();

    // Assert
    assert!(dispatched.is_applied());
    let item = flat.queries().item(&new_id).unwrap();
    assert_eq!(item.label, "New");
    assert_eq!(item.color, Color::Lime);
    assert_eq!(flat.queries().path_to_item(&new_id).unwrap(), vec![id("b")]);
}

#[rstest]
#[case("")]
#[case("   ")]
fn given_blank_label_when_submitting_add_then_empty_label(flat: TreeStore, #[case] label: &str) {
    // Arrange
    let mut form = AddForm::new();
    form.label = label.into();

    // Act
    let err = form.into_action(flat.queries(), Color::Gray).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::Form(FormError::EmptyLabel)));
}

#[test]
fn given_two_add_forms_when_created_then_ids_differ() {
    assert_ne!(AddForm::new().item_id, AddForm::default().item_id);
}

#[rstest]
fn given_edit_form_when_submitted_then_produces_label_and_color_patch(mut flat: TreeStore) {
    // Arrange
    let item = flat.queries().item(&id("c")).unwrap().clone();
    let mut form = EditForm::from_item(&item);
    form.label = "Sea".into();
    form.color = parse_color("teal").unwrap();

    // Act
    let action = form.into_action().unwrap();
    flat.dispatch(action).unwrap();

    // Assert
    let edited = flat.queries().item(&id("c")).unwrap();
    assert_eq!(edited.label, "Sea");
    assert_eq!(edited.color, Color::Teal);
}

#[test]
fn given_unknown_color_name_when_parsing_then_form_error() {
    assert_eq!(
        parse_color("mauve"),
        Err(FormError::UnknownColor("mauve".into()))
    );
}

#[rstest]
fn given_item_when_confirming_removal_then_prompt_names_it(flat: TreeStore) {
    // Arrange
    let item = flat.queries().item(&id("b")).unwrap();

    // Act / Assert
    assert_eq!(
        confirm_remove(item),
        "Are you sure you want to remove \"B\"?"
    );
    assert_eq!(remove_action(item), TreeAction::NodeRemove { item_id: id("b") });
}

#[test]
fn given_registered_row_when_dialog_moves_it_then_menu_trigger_gets_focus() {
    // Arrange
    let mut view: TreeView<&str> = TreeView::mount(Tree::demo(), Duration::from_millis(500));
    let _row = view.register_tree_item(id("3"), "row-3", "menu-3");
    let mut form = MoveForm::new(view.store().queries(), id("3")).unwrap();
    form.select_parent(Parent::from("2"));

    // Act
    let action = form.into_action(view.store().queries()).unwrap();
    let (dispatched, focus) = view.dispatch_from_dialog(action).unwrap();

    // Assert
    assert_eq!(dispatched, Dispatched::Applied { revision: 1 });
    assert_eq!(focus, Some("menu-3"));
    assert_eq!(view.get_path_to_item(&id("3")).unwrap(), vec![id("2")]);
}
