//! Selection panel: echoes the backend's selection and drives its lifecycle.

use btdebug_protocol::{Command, Snapshot};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::spawner::focusable_line;

/// Name rows shown at once; longer lists scroll to follow the cursor.
pub const MAX_VISIBLE_NAMES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionAction {
    StartSelecting,
    DeleteSelected,
    ClearSelection,
}

impl SelectionAction {
    pub const ALL: [SelectionAction; 3] = [
        SelectionAction::StartSelecting,
        SelectionAction::DeleteSelected,
        SelectionAction::ClearSelection,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SelectionAction::StartSelecting => "Select Mob to Debug",
            SelectionAction::DeleteSelected => "Delete Selected",
            SelectionAction::ClearSelection => "Clear Selection",
        }
    }

    fn command(&self) -> Command {
        match self {
            SelectionAction::StartSelecting => Command::StartSelecting,
            SelectionAction::DeleteSelected => Command::DeleteSelected,
            SelectionAction::ClearSelection => Command::ClearSelection,
        }
    }

    fn color(&self) -> Color {
        match self {
            SelectionAction::StartSelecting => Color::Green,
            SelectionAction::DeleteSelected => Color::Red,
            SelectionAction::ClearSelection => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionButton {
    pub action: SelectionAction,
    pub enabled: bool,
}

impl SelectionButton {
    /// The command this button issues, or `None` while disabled.
    pub fn command(&self) -> Option<Command> {
        self.enabled.then(|| self.action.command())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView<'a> {
    pub title: String,
    pub selecting: bool,
    pub buttons: [SelectionButton; 3],
    /// Selected names; `None` when the selection is empty.
    pub names: Option<&'a [String]>,
}

pub fn selection_view(snapshot: &Snapshot) -> SelectionView<'_> {
    let has_selection = snapshot.has_selection();
    let buttons = SelectionAction::ALL.map(|action| SelectionButton {
        action,
        enabled: action == SelectionAction::StartSelecting || has_selection,
    });

    SelectionView {
        title: format!(" Selected Mobs ({}) ", snapshot.selected_count),
        selecting: snapshot.selecting,
        buttons,
        names: (!snapshot.selected_mobs.is_empty()).then_some(snapshot.selected_mobs.as_slice()),
    }
}

/// Rows the panel needs, borders included.
pub fn selection_height(view: &SelectionView<'_>) -> u16 {
    let mut rows = view.buttons.len() + 2; // buttons, blank, hint
    if view.selecting {
        rows += 1;
    }
    if let Some(names) = view.names {
        rows += names.len().min(MAX_VISIBLE_NAMES) + 1; // separator
        if names.len() > MAX_VISIBLE_NAMES {
            rows += 1; // position indicator
        }
    }
    (rows + 2) as u16
}

/// First name row to show so that the focused name, if any, is visible.
pub fn name_scroll(name_count: usize, focused_name: Option<usize>) -> usize {
    let max_scroll = name_count.saturating_sub(MAX_VISIBLE_NAMES);
    match focused_name {
        Some(i) if i >= MAX_VISIBLE_NAMES => (i + 1 - MAX_VISIBLE_NAMES).min(max_scroll),
        _ => 0,
    }
}

pub fn draw_selection(
    frame: &mut Frame,
    area: Rect,
    view: &SelectionView<'_>,
    focus: Option<usize>,
) {
    let block = Block::default()
        .title(view.title.clone())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines: Vec<Line> = view
        .buttons
        .iter()
        .enumerate()
        .map(|(i, button)| {
            let style = if button.enabled {
                Style::default()
                    .fg(button.action.color())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            focusable_line(
                format!("[ {} ]", button.action.label()),
                style,
                focus == Some(i),
            )
        })
        .collect();

    if view.selecting {
        lines.push(Line::from(Span::styled(
            "  Picking... click a mob in game",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(names) = view.names {
        lines.push(Line::from(Span::styled(
            "  ──────────",
            Style::default().fg(Color::DarkGray),
        )));

        let focused_name = focus.and_then(|f| f.checked_sub(view.buttons.len()));
        let first = name_scroll(names.len(), focused_name);
        for (i, name) in names.iter().enumerate().skip(first).take(MAX_VISIBLE_NAMES) {
            lines.push(focusable_line(
                format!("• {}", name),
                Style::default().fg(Color::White),
                focused_name == Some(i),
            ));
        }
        if names.len() > MAX_VISIBLE_NAMES {
            let last = (first + MAX_VISIBLE_NAMES).min(names.len());
            lines.push(Line::from(Span::styled(
                format!("  ({}-{} of {})", first + 1, last, names.len()),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Hint: Ctrl+Click to multi-select | Shift+Drag for box select",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(count: u64, names: &[&str]) -> Snapshot {
        Snapshot {
            selected_count: count,
            selected_mobs: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_selection_disables_delete_and_clear() {
        let snap = snapshot(0, &[]);
        let view = selection_view(&snap);
        assert_eq!(view.title, " Selected Mobs (0) ");
        assert!(view.buttons[0].enabled);
        assert!(!view.buttons[1].enabled);
        assert!(!view.buttons[2].enabled);
        assert!(view.buttons[1].command().is_none());
        assert!(view.buttons[2].command().is_none());
        assert!(view.names.is_none());
    }

    #[test]
    fn populated_selection_enables_buttons_and_lists_names() {
        let snap = snapshot(3, &["Rat", "Bat", "Cat"]);
        let view = selection_view(&snap);
        assert_eq!(view.title, " Selected Mobs (3) ");
        assert!(view.buttons.iter().all(|b| b.enabled));
        assert_eq!(view.buttons[1].command(), Some(Command::DeleteSelected));
        assert_eq!(view.buttons[2].command(), Some(Command::ClearSelection));
        assert_eq!(view.names.unwrap(), ["Rat", "Bat", "Cat"]);
    }

    #[test]
    fn start_selecting_is_always_available() {
        let snapshot = Snapshot::default();
        let view = selection_view(&snapshot);
        assert_eq!(view.buttons[0].command(), Some(Command::StartSelecting));
    }

    #[test]
    fn name_list_follows_focus() {
        assert_eq!(name_scroll(3, Some(2)), 0);
        assert_eq!(name_scroll(9, None), 0);
        assert_eq!(name_scroll(9, Some(5)), 0);
        assert_eq!(name_scroll(9, Some(6)), 1);
        assert_eq!(name_scroll(9, Some(8)), 3);
        assert_eq!(name_scroll(9, Some(20)), 3);
    }

    #[test]
    fn height_grows_with_names() {
        let empty = snapshot(0, &[]);
        let full = snapshot(2, &["Rat", "Bat"]);
        assert_eq!(selection_height(&selection_view(&empty)), 7);
        assert_eq!(selection_height(&selection_view(&full)), 10);
    }
}
