//! Debug window composition.
//!
//! The left column shows either the active target (blackboard and tree) or
//! a placeholder; the sidebar with selection and spawn panels is always
//! drawn. Which left-hand layout is used depends only on `has_ai` in the
//! current snapshot.

use btdebug_protocol::{Blackboard, Snapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::node::{render_node, tree_lines, NodeView};
use super::selection::{draw_selection, selection_height, selection_view};
use super::sidebar::selection_rows;
use super::spawner::{draw_spawner, spawner_view};
use crate::state::UiState;

pub const INACTIVE_TITLE: &str = "Behavior Tree Debugger";

pub fn window_title(snapshot: &Snapshot) -> String {
    if snapshot.has_ai {
        format!("BT Debug: {}", snapshot.mob_name)
    } else {
        INACTIVE_TITLE.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlackboardView<'a> {
    Empty,
    Rows(Vec<(&'a str, &'a str)>),
}

pub fn blackboard_view(blackboard: &Blackboard) -> BlackboardView<'_> {
    if blackboard.is_empty() {
        BlackboardView::Empty
    } else {
        BlackboardView::Rows(
            blackboard
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowMode<'a> {
    /// No debug target: placeholder only.
    Inactive,
    Active {
        blackboard: BlackboardView<'a>,
        tree: Option<NodeView>,
    },
}

pub fn window_mode(snapshot: &Snapshot) -> WindowMode<'_> {
    if snapshot.has_ai {
        WindowMode::Active {
            blackboard: blackboard_view(&snapshot.blackboard),
            tree: render_node(snapshot.tree.as_ref()),
        }
    } else {
        WindowMode::Inactive
    }
}

/// Draw the whole debug window into `area`.
pub fn draw_window(frame: &mut Frame, area: Rect, snapshot: &Snapshot, ui: &UiState) {
    let block = Block::default()
        .title(format!(" {} ", window_title(snapshot)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner);

    match window_mode(snapshot) {
        WindowMode::Inactive => draw_placeholder(frame, columns[0]),
        WindowMode::Active { blackboard, tree } => {
            draw_target(frame, columns[0], &blackboard, tree.as_ref(), ui)
        }
    }

    draw_sidebar(frame, columns[1], snapshot, ui);
}

fn draw_placeholder(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" No Mob Selected ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Choose \"Select Mob to Debug\" to pick a mob",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "Or spawn mobs using the panel on the right",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_target(
    frame: &mut Frame,
    area: Rect,
    blackboard: &BlackboardView<'_>,
    tree: Option<&NodeView>,
    ui: &UiState,
) {
    let rows = match blackboard {
        BlackboardView::Empty => 1,
        BlackboardView::Rows(rows) => rows.len(),
    };
    let blackboard_height = (rows as u16 + 2).min(area.height / 2).max(3);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(blackboard_height), Constraint::Min(3)])
        .split(area);

    draw_blackboard(frame, sections[0], blackboard, ui.blackboard_scroll());
    draw_tree(frame, sections[1], tree, ui.tree_scroll());
}

/// Rows that do not fit are reached by scrolling; the offset stops once the
/// last key is on screen.
fn draw_blackboard(frame: &mut Frame, area: Rect, view: &BlackboardView<'_>, scroll: u16) {
    let block = Block::default()
        .title(" Blackboard ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let lines: Vec<Line> = match view {
        BlackboardView::Empty => vec![Line::from(Span::styled(
            "  Empty",
            Style::default().fg(Color::DarkGray),
        ))],
        BlackboardView::Rows(rows) => rows
            .iter()
            .map(|(key, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {}: ", key),
                        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(value.to_string(), Style::default().fg(Color::White)),
                ])
            })
            .collect(),
    };

    let visible = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible) as u16;
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}

fn draw_tree(frame: &mut Frame, area: Rect, tree: Option<&NodeView>, scroll: u16) {
    let block = Block::default()
        .title(" Tree Structure ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue));

    let Some(root) = tree else {
        frame.render_widget(block, area);
        return;
    };

    let lines = tree_lines(root);
    let max_scroll = lines.len().saturating_sub(1) as u16;
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, snapshot: &Snapshot, ui: &UiState) {
    let selection = selection_view(snapshot);
    let categories = spawner_view(&snapshot.spawn_categories, &ui.spawner);

    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(selection_height(&selection)),
            Constraint::Min(4),
        ])
        .split(area);

    let cursor = ui.cursor();
    let selection_len = selection_rows(snapshot);
    let (selection_focus, spawner_focus) = if cursor < selection_len {
        (Some(cursor), None)
    } else {
        (None, Some(cursor - selection_len))
    };

    draw_selection(frame, panels[0], &selection, selection_focus);
    draw_spawner(frame, panels[1], &categories, spawner_focus);
}
