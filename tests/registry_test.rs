//! Row registry lifecycle.

use dragtree::application::services::{ItemRegistry, RowHandles};
use dragtree::domain::ItemId;

fn id(s: &str) -> ItemId {
    ItemId::from(s)
}

#[test]
fn given_mounted_rows_when_looking_up_then_returns_their_handles() {
    // Arrange
    let registry = ItemRegistry::new();
    let _one = registry.register(id("1"), "row-1", "menu-1");
    let _two = registry.register(id("2"), "row-2", "menu-2");

    // Act
    let handles = registry.handles(&id("2"));

    // Assert
    assert_eq!(registry.len(), 2);
    assert_eq!(
        handles,
        Some(RowHandles {
            element: "row-2",
            action_menu_trigger: "menu-2",
        })
    );
    assert_eq!(registry.element(&id("1")), Some("row-1"));
    assert_eq!(registry.focus_target(&id("1")), Some("menu-1"));
}

#[test]
fn given_explicit_unregister_when_called_then_row_is_gone() {
    // Arrange
    let registry = ItemRegistry::new();
    let row = registry.register(id("1"), 10, 11);

    // Act
    row.unregister();

    // Assert
    assert!(!registry.is_registered(&id("1")));
    assert_eq!(registry.focus_target(&id("1")), None);
}

#[test]
fn given_remount_when_stale_guard_drops_then_new_registration_survives() {
    // Arrange
    let registry = ItemRegistry::new();
    let stale = registry.register(id("1"), "old-row", "old-menu");
    let current = registry.register(id("1"), "new-row", "new-menu");

    // Act
    drop(stale);

    // Assert
    assert!(registry.is_registered(&id("1")));
    assert_eq!(registry.element(&id("1")), Some("new-row"));

    drop(current);
    assert!(registry.is_empty());
}

#[test]
fn given_unmounted_view_when_guards_outlive_registry_then_dropping_is_harmless() {
    // Arrange
    let registry = ItemRegistry::new();
    let guards: Vec<_> = ["1", "2", "3"]
        .into_iter()
        .map(|s| registry.register(id(s), s.to_string(), format!("menu-{s}")))
        .collect();

    // Act
    drop(registry);

    // Assert: no panic when the disposers run afterwards
    drop(guards);
}
