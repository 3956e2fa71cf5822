//! termtree rendering of the item forest.

use colored::Colorize;
use termtree::Tree as TermTree;

use crate::domain::{Color, Tree, TreeItem};

const OPEN: &str = "▾";
const CLOSED: &str = "▸";
const LEAF: &str = "•";

pub trait TreeRender {
    fn to_tree_string(&self) -> TermTree<String>;
}

fn term_color(color: Color) -> colored::Color {
    match color {
        Color::Red => colored::Color::Red,
        Color::Blue => colored::Color::Blue,
        Color::Green => colored::Color::Green,
        Color::Yellow => colored::Color::Yellow,
        Color::Purple => colored::Color::Magenta,
        Color::Pink => colored::Color::BrightMagenta,
        Color::Indigo => colored::Color::TrueColor { r: 75, g: 0, b: 130 },
        Color::Teal => colored::Color::TrueColor { r: 0, g: 128, b: 128 },
        Color::Orange => colored::Color::TrueColor { r: 255, g: 165, b: 0 },
        Color::Cyan => colored::Color::Cyan,
        Color::Lime => colored::Color::BrightGreen,
        Color::Gray => colored::Color::BrightBlack,
    }
}

/// One row: marker, coloured label, dimmed id.
pub fn item_line(item: &TreeItem) -> String {
    let marker = match (item.is_leaf(), item.is_open) {
        (true, _) => LEAF,
        (false, true) => OPEN,
        (false, false) => CLOSED,
    };
    format!(
        "{} {} {}",
        marker,
        item.label.color(term_color(item.color)),
        format!("({})", item.id).dimmed()
    )
}

impl TreeRender for TreeItem {
    fn to_tree_string(&self) -> TermTree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        TermTree::new(item_line(self)).with_leaves(leaves)
    }
}

impl TreeRender for Tree {
    fn to_tree_string(&self) -> TermTree<String> {
        if self.is_empty() {
            return TermTree::new("Empty tree".to_string());
        }
        let leaves: Vec<_> = self.items().iter().map(|c| c.to_tree_string()).collect();
        TermTree::new(".".to_string()).with_leaves(leaves)
    }
}
