//! Outbound instructions, controller to renderer.

use serde::{Deserialize, Serialize};

use crate::menu::{Menu, MenuItem, Platform};

/// Correlation number attached to actions and click events.
///
/// Chosen and interpreted by the embedding application only.
pub type SeqId = i64;

/// An update sent to the renderer.
///
/// Serialized with a `type` tag: `update-item`, `update-menu` or
/// `update-menu-and-item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    UpdateItem {
        item: MenuItem,
        seq_id: SeqId,
    },
    UpdateMenu {
        menu: Menu,
        seq_id: SeqId,
    },
    UpdateMenuAndItem {
        menu: Menu,
        item: MenuItem,
        seq_id: SeqId,
    },
}

impl Action {
    /// Returns the wire tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::UpdateItem { .. } => "update-item",
            Action::UpdateMenu { .. } => "update-menu",
            Action::UpdateMenuAndItem { .. } => "update-menu-and-item",
        }
    }

    pub fn seq_id(&self) -> SeqId {
        match self {
            Action::UpdateItem { seq_id, .. }
            | Action::UpdateMenu { seq_id, .. }
            | Action::UpdateMenuAndItem { seq_id, .. } => *seq_id,
        }
    }

    /// The menu carried by this action, if any.
    pub fn menu(&self) -> Option<&Menu> {
        match self {
            Action::UpdateMenu { menu, .. } | Action::UpdateMenuAndItem { menu, .. } => Some(menu),
            Action::UpdateItem { .. } => None,
        }
    }

    /// Applies the checked-marker rule to every item reachable from this
    /// action.
    pub fn apply_checked_marker(&mut self, platform: Platform) {
        match self {
            Action::UpdateItem { item, .. } => item.apply_checked_marker(platform),
            Action::UpdateMenu { menu, .. } => menu.apply_checked_marker(platform),
            Action::UpdateMenuAndItem { menu, item, .. } => {
                menu.apply_checked_marker(platform);
                item.apply_checked_marker(platform);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_menu() -> Menu {
        Menu {
            icon: "icon.png".into(),
            title: "T".into(),
            tooltip: "tt".into(),
            items: vec![
                MenuItem::new("A"),
                MenuItem::new("B").with_checked(true),
            ],
        }
    }

    #[test]
    fn update_item_tag() {
        let action = Action::UpdateItem {
            item: MenuItem::new("B"),
            seq_id: 7,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "update-item");
        assert_eq!(json["seq_id"], 7);
        assert_eq!(json["item"]["title"], "B");
    }

    #[test]
    fn update_menu_and_item_carries_both() {
        let action = Action::UpdateMenuAndItem {
            menu: sample_menu(),
            item: MenuItem::new("C"),
            seq_id: 3,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "update-menu-and-item");
        assert_eq!(json["menu"]["items"].as_array().unwrap().len(), 2);
        assert_eq!(json["item"]["title"], "C");
        assert_eq!(action.kind(), "update-menu-and-item");
    }

    #[test]
    fn marker_reaches_menu_and_item() {
        let mut action = Action::UpdateMenuAndItem {
            menu: sample_menu(),
            item: MenuItem::new("C").with_checked(true),
            seq_id: 1,
        };
        action.apply_checked_marker(Platform::Linux);
        let Action::UpdateMenuAndItem { menu, item, .. } = action else {
            panic!("variant changed");
        };
        assert_eq!(menu.items[0].title, "A");
        assert_eq!(menu.items[1].title, "B (√)");
        assert_eq!(item.title, "C (√)");
    }

    #[test]
    fn accessors() {
        let action = Action::UpdateMenu {
            menu: sample_menu(),
            seq_id: -1,
        };
        assert_eq!(action.seq_id(), -1);
        assert_eq!(action.menu().unwrap().title, "T");
        assert!(
            Action::UpdateItem {
                item: MenuItem::new("x"),
                seq_id: 0
            }
            .menu()
            .is_none()
        );
    }
}
