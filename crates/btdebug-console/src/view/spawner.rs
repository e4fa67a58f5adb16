//! Spawn catalog panel.

use std::collections::BTreeSet;

use btdebug_protocol::{Command, SpawnCatalog};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Which catalog categories the user has opened.
///
/// Lives for as long as the console does and is never part of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnerState {
    expanded: BTreeSet<String>,
}

impl SpawnerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_category(&mut self, category: &str) {
        if !self.expanded.remove(category) {
            self.expanded.insert(category.to_string());
        }
    }

    pub fn is_expanded(&self, category: &str) -> bool {
        self.expanded.contains(category)
    }
}

/// An activatable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnEntry<'a> {
    pub name: &'a str,
    pub path: &'a str,
}

impl SpawnEntry<'_> {
    pub fn command(&self) -> Command {
        Command::SpawnMob {
            path: self.path.to_string(),
        }
    }
}

/// One collapsible category. `entries` is empty while the category is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView<'a> {
    pub name: &'a str,
    pub open: bool,
    pub entries: Vec<SpawnEntry<'a>>,
}

/// Categories without entries are left out entirely.
pub fn spawner_view<'a>(catalog: &'a SpawnCatalog, state: &SpawnerState) -> Vec<CategoryView<'a>> {
    catalog
        .iter()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(category, entries)| {
            let open = state.is_expanded(category);
            let entries = if open {
                entries
                    .iter()
                    .map(|(name, path)| SpawnEntry {
                        name: name.as_str(),
                        path: path.as_str(),
                    })
                    .collect()
            } else {
                Vec::new()
            };
            CategoryView {
                name: category.as_str(),
                open,
                entries,
            }
        })
        .collect()
}

/// Draw the spawn panel. `focus` indexes the panel's rows in the same
/// order as the sidebar items: each header followed by its open entries.
pub fn draw_spawner(
    frame: &mut Frame,
    area: Rect,
    categories: &[CategoryView<'_>],
    focus: Option<usize>,
) {
    let block = Block::default()
        .title(" Spawn Mobs ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut lines: Vec<Line> = Vec::new();
    let mut row = 0usize;

    for category in categories {
        let marker = if category.open { "▾" } else { "▸" };
        lines.push(focusable_line(
            format!("{} {}", marker, category.name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            focus == Some(row),
        ));
        row += 1;

        for entry in &category.entries {
            lines.push(focusable_line(
                format!("    {}", entry.name),
                Style::default().fg(Color::White),
                focus == Some(row),
            ));
            row += 1;
        }
    }

    if categories.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Nothing to spawn.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Hint: Mobs spawn at your location",
        Style::default().fg(Color::DarkGray),
    )));

    // Keep the focused row on screen.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = match focus {
        Some(f) if visible > 0 && f >= visible => f + 1 - visible,
        _ => 0,
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

/// A sidebar row, reversed while the cursor is on it.
pub(crate) fn focusable_line(text: String, style: Style, focused: bool) -> Line<'static> {
    let (cursor, style) = if focused {
        ("> ", style.add_modifier(Modifier::REVERSED))
    } else {
        ("  ", style)
    };
    Line::from(vec![
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
        Span::styled(text, style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpawnCatalog {
        let mut catalog = SpawnCatalog::new();
        catalog.insert(
            "Animals".to_string(),
            [
                ("Rat".to_string(), "/mob/living/basic/rat".to_string()),
                ("Bat".to_string(), "/mob/living/basic/bat".to_string()),
            ]
            .into_iter()
            .collect(),
        );
        catalog.insert("Empty".to_string(), Default::default());
        catalog
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut state = SpawnerState::new();
        state.toggle_category("Humans");
        let before = state.clone();

        state.toggle_category("Animals");
        assert!(state.is_expanded("Animals"));
        state.toggle_category("Animals");
        assert_eq!(state, before);
    }

    #[test]
    fn categories_start_collapsed() {
        let catalog = catalog();
        let view = spawner_view(&catalog, &SpawnerState::new());
        assert_eq!(view.len(), 1);
        assert!(view.iter().all(|c| !c.open && c.entries.is_empty()));
    }

    #[test]
    fn open_category_lists_every_entry() {
        let catalog = catalog();
        let mut state = SpawnerState::new();
        state.toggle_category("Animals");
        state.toggle_category("Empty");

        let view = spawner_view(&catalog, &state);
        let animals = view.iter().find(|c| c.name == "Animals").unwrap();
        assert!(animals.open);
        let names: Vec<&str> = animals.entries.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Bat", "Rat"]);

        assert!(view.iter().all(|c| c.name != "Empty"));
    }

    #[test]
    fn entry_issues_spawn_command() {
        let entry = SpawnEntry {
            name: "Human",
            path: "/mob/living/carbon/human",
        };
        assert_eq!(
            entry.command(),
            Command::SpawnMob {
                path: "/mob/living/carbon/human".to_string()
            }
        );
    }

    #[test]
    fn absent_catalog_renders_no_categories() {
        let catalog = SpawnCatalog::new();
        let view = spawner_view(&catalog, &SpawnerState::new());
        assert!(view.is_empty());
    }
}
