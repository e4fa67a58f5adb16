//! Keyboard-addressable sidebar items.
//!
//! The sidebar is a flat list: the three selection buttons, the selected
//! mob names, then each spawn category header followed by its entries while
//! it is open. The list is
//! rebuilt from every snapshot, so a cursor into it must be clamped after
//! each push.

use btdebug_protocol::{Command, Snapshot};

use super::selection::{selection_view, SelectionButton};
use super::spawner::{spawner_view, SpawnEntry, SpawnerState};

/// Number of selection buttons at the head of the sidebar.
pub const SELECTION_ITEM_COUNT: usize = 3;

/// Rows belonging to the selection panel: its buttons plus one per name.
pub fn selection_rows(snapshot: &Snapshot) -> usize {
    SELECTION_ITEM_COUNT + snapshot.selected_mobs.len()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarItem {
    Button(SelectionButton),
    /// A selected mob's name; only there so the list can be scrolled.
    SelectedMob(String),
    Category(String),
    Entry {
        name: String,
        path: String,
    },
}

pub fn sidebar_items(snapshot: &Snapshot, spawner: &SpawnerState) -> Vec<SidebarItem> {
    let mut items: Vec<SidebarItem> = selection_view(snapshot)
        .buttons
        .into_iter()
        .map(SidebarItem::Button)
        .collect();
    items.extend(snapshot.selected_mobs.iter().cloned().map(SidebarItem::SelectedMob));

    for category in spawner_view(&snapshot.spawn_categories, spawner) {
        items.push(SidebarItem::Category(category.name.to_string()));
        items.extend(category.entries.iter().map(|e| SidebarItem::Entry {
            name: e.name.to_string(),
            path: e.path.to_string(),
        }));
    }

    items
}

/// Activate an item. Category headers only toggle local expansion state;
/// everything else maps to at most one backend command.
pub fn activate(item: &SidebarItem, spawner: &mut SpawnerState) -> Option<Command> {
    match item {
        SidebarItem::Button(button) => button.command(),
        SidebarItem::SelectedMob(_) => None,
        SidebarItem::Category(name) => {
            spawner.toggle_category(name);
            None
        }
        SidebarItem::Entry { name, path } => Some(
            SpawnEntry {
                name: name.as_str(),
                path: path.as_str(),
            }
            .command(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        let mut snap = Snapshot::default();
        snap.spawn_categories.insert(
            "Humans".to_string(),
            [("Human".to_string(), "/mob/living/carbon/human".to_string())]
                .into_iter()
                .collect(),
        );
        snap
    }

    #[test]
    fn closed_catalog_lists_headers_only() {
        let items = sidebar_items(&snapshot(), &SpawnerState::new());
        assert_eq!(items.len(), SELECTION_ITEM_COUNT + 1);
        assert_eq!(items[3], SidebarItem::Category("Humans".to_string()));
    }

    #[test]
    fn header_activation_toggles_without_command() {
        let snap = snapshot();
        let mut spawner = SpawnerState::new();
        let items = sidebar_items(&snap, &spawner);

        assert_eq!(activate(&items[3], &mut spawner), None);
        assert!(spawner.is_expanded("Humans"));

        let items = sidebar_items(&snap, &spawner);
        assert_eq!(items.len(), SELECTION_ITEM_COUNT + 2);
    }

    #[test]
    fn entry_activation_leaves_local_state_alone() {
        let snap = snapshot();
        let mut spawner = SpawnerState::new();
        spawner.toggle_category("Humans");
        let before = spawner.clone();

        let items = sidebar_items(&snap, &spawner);
        let command = activate(&items[4], &mut spawner);
        assert_eq!(
            command,
            Some(Command::SpawnMob {
                path: "/mob/living/carbon/human".to_string()
            })
        );
        assert_eq!(spawner, before);
    }

    #[test]
    fn selected_names_sit_between_buttons_and_catalog() {
        let mut snap = snapshot();
        snap.selected_count = 2;
        snap.selected_mobs = vec!["Rat".to_string(), "Bat".to_string()];
        let mut spawner = SpawnerState::new();

        let items = sidebar_items(&snap, &spawner);
        assert_eq!(selection_rows(&snap), 5);
        assert_eq!(items[3], SidebarItem::SelectedMob("Rat".to_string()));
        assert_eq!(items[4], SidebarItem::SelectedMob("Bat".to_string()));
        assert_eq!(items[5], SidebarItem::Category("Humans".to_string()));
        assert_eq!(activate(&items[4], &mut spawner), None);
        assert_eq!(spawner, SpawnerState::new());
    }

    #[test]
    fn disabled_buttons_issue_nothing() {
        let items = sidebar_items(&Snapshot::default(), &SpawnerState::new());
        let mut spawner = SpawnerState::new();
        assert_eq!(activate(&items[0], &mut spawner), Some(Command::StartSelecting));
        assert_eq!(activate(&items[1], &mut spawner), None);
        assert_eq!(activate(&items[2], &mut spawner), None);
    }
}
