//! Console-local UI state.
//!
//! Everything here belongs to the console alone: category expansion, the
//! sidebar cursor and the blackboard and tree scroll offsets. None of it is ever merged into
//! a snapshot, and the selection itself is never cached here; it is always
//! read from the latest snapshot.

use btdebug_protocol::{Command, Snapshot};

use crate::view::sidebar::{activate, sidebar_items};
use crate::view::spawner::SpawnerState;

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub spawner: SpawnerState,
    cursor: usize,
    tree_scroll: u16,
    blackboard_scroll: u16,
    /// Target the scroll offsets refer to.
    scrolled_target: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn tree_scroll(&self) -> u16 {
        self.tree_scroll
    }

    pub fn blackboard_scroll(&self) -> u16 {
        self.blackboard_scroll
    }

    /// Bring local state back in line with a freshly pushed snapshot.
    pub fn reconcile(&mut self, snapshot: &Snapshot) {
        let len = sidebar_items(snapshot, &self.spawner).len();
        self.cursor = self.cursor.min(len.saturating_sub(1));

        let target = snapshot.has_ai.then(|| snapshot.mob_name.clone());
        if target != self.scrolled_target {
            self.tree_scroll = 0;
            self.blackboard_scroll = 0;
            self.scrolled_target = target;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self, snapshot: &Snapshot) {
        let len = sidebar_items(snapshot, &self.spawner).len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    /// Activate the item under the cursor.
    pub fn activate(&mut self, snapshot: &Snapshot) -> Option<Command> {
        let items = sidebar_items(snapshot, &self.spawner);
        let item = items.get(self.cursor)?;
        activate(item, &mut self.spawner)
    }

    pub fn scroll_tree_up(&mut self, step: u16) {
        self.tree_scroll = self.tree_scroll.saturating_sub(step);
    }

    pub fn scroll_tree_down(&mut self, step: u16) {
        self.tree_scroll = self.tree_scroll.saturating_add(step);
    }

    pub fn scroll_blackboard_up(&mut self, step: u16) {
        self.blackboard_scroll = self.blackboard_scroll.saturating_sub(step);
    }

    // Clamped against the row count when drawn.
    pub fn scroll_blackboard_down(&mut self, step: u16) {
        self.blackboard_scroll = self.blackboard_scroll.saturating_add(step);
    }
}
