//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique, immutable identifier of a tree item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id, as handed out by the add dialog before dispatch.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Fixed colour palette for the item indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
    Indigo,
    Teal,
    Orange,
    Cyan,
    Lime,
    #[default]
    Gray,
}

impl Color {
    pub const ALL: [Color; 12] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
        Color::Pink,
        Color::Indigo,
        Color::Teal,
        Color::Orange,
        Color::Cyan,
        Color::Lime,
        Color::Gray,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Indigo => "indigo",
            Color::Teal => "teal",
            Color::Orange => "orange",
            Color::Cyan => "cyan",
            Color::Lime => "lime",
            Color::Gray => "gray",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the forest.
///
/// `children` order is the sibling display order. `is_open` is the UI
/// expansion flag and is only meaningful when `children` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeItem {
    pub id: ItemId,
    pub label: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeItem>,
}

impl TreeItem {
    /// Leaf item with the default colour.
    pub fn new(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: Color::default(),
            children: Vec::new(),
            is_open: false,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_children(mut self, children: Vec<TreeItem>) -> Self {
        self.children = children;
        self
    }

    pub fn opened(mut self) -> Self {
        self.is_open = true;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Label/colour part of the item, used by edit.
    pub fn patch(&self) -> ItemPatch {
        ItemPatch {
            label: self.label.clone(),
            color: self.color,
        }
    }
}

/// Editable attributes of an item. Structure is never part of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub label: String,
    pub color: Color,
}

/// Parent slot of an item: the forest root or a concrete item.
///
/// On the wire the root is the empty string (dialogs also send `NONE`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Parent {
    #[default]
    Root,
    Item(ItemId),
}

/// Dialog placeholder for "no parent".
pub const NO_PARENT: &str = "NONE";

impl Parent {
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            Parent::Root => None,
            Parent::Item(id) => Some(id),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Parent::Root)
    }

    pub fn is(&self, id: &ItemId) -> bool {
        self.item_id() == Some(id)
    }
}

impl From<String> for Parent {
    fn from(s: String) -> Self {
        if s.is_empty() || s == NO_PARENT {
            Parent::Root
        } else {
            Parent::Item(ItemId(s))
        }
    }
}

impl From<&str> for Parent {
    fn from(s: &str) -> Self {
        Parent::from(s.to_string())
    }
}

impl From<ItemId> for Parent {
    fn from(id: ItemId) -> Self {
        Parent::Item(id)
    }
}

impl From<Option<ItemId>> for Parent {
    fn from(id: Option<ItemId>) -> Self {
        id.map_or(Parent::Root, Parent::Item)
    }
}

impl From<Parent> for String {
    fn from(p: Parent) -> Self {
        match p {
            Parent::Root => String::new(),
            Parent::Item(id) => id.0,
        }
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parent::Root => f.write_str("<root>"),
            Parent::Item(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_or_none_string_when_converting_then_parent_is_root() {
        assert_eq!(Parent::from(""), Parent::Root);
        assert_eq!(Parent::from(NO_PARENT), Parent::Root);
        assert_eq!(Parent::from("2"), Parent::Item(ItemId::from("2")));
    }

    #[test]
    fn given_color_name_when_parsing_then_case_is_ignored() {
        assert_eq!(Color::parse("Teal"), Some(Color::Teal));
        assert_eq!(Color::parse("mauve"), None);
    }

    #[test]
    fn given_generated_ids_when_comparing_then_they_differ() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }
}
