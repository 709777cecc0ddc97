//! Popup menu opened over the list.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SelectAll,
    ClearSelection,
    DeleteSelected,
    DeleteAll,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::SelectAll,
        MenuAction::ClearSelection,
        MenuAction::DeleteSelected,
        MenuAction::DeleteAll,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::SelectAll => "Select all",
            MenuAction::ClearSelection => "Clear selection",
            MenuAction::DeleteSelected => "Delete selected",
            MenuAction::DeleteAll => "Delete all",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    /// Rect the menu is attached to, usually the selected row.
    anchor: Rect,
    selected: usize,
}

impl ContextMenu {
    pub fn new(anchor: Rect) -> Self {
        Self { anchor, selected: 0 }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % MenuAction::ALL.len();
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + MenuAction::ALL.len() - 1) % MenuAction::ALL.len();
    }

    pub fn current(&self) -> MenuAction {
        MenuAction::ALL[self.selected]
    }

    /// Below the anchor when it fits, above it otherwise, clamped to `bounds`.
    pub fn popup_area(&self, bounds: Rect) -> Rect {
        let width = MenuAction::ALL
            .iter()
            .map(|a| a.label().len() as u16)
            .max()
            .unwrap_or(0)
            + 4;
        let height = MenuAction::ALL.len() as u16 + 2;
        let width = width.min(bounds.width);
        let height = height.min(bounds.height);

        let below = self.anchor.y.saturating_add(self.anchor.height);
        let y = if below + height <= bounds.y + bounds.height {
            below
        } else {
            self.anchor.y.saturating_sub(height).max(bounds.y)
        };
        let x = self
            .anchor
            .x
            .saturating_add(2)
            .min(bounds.x + bounds.width - width)
            .max(bounds.x);

        Rect::new(x, y, width, height)
    }
}

pub struct ContextMenuWidget<'a> {
    menu: &'a ContextMenu,
    theme: &'a Theme,
}

impl<'a> ContextMenuWidget<'a> {
    pub fn new(menu: &'a ContextMenu, theme: &'a Theme) -> Self {
        Self { menu, theme }
    }
}

impl Widget for ContextMenuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let current = self.menu.current();
        let lines: Vec<Line> = MenuAction::ALL
            .iter()
            .map(|action| {
                let style = if *action == current {
                    Style::default()
                        .fg(self.theme.selection_fg)
                        .bg(self.theme.selection_bg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.foreground)
                };
                Line::styled(format!(" {} ", action.label()), style)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.accent))
                    .style(Style::default().bg(self.theme.background)),
            )
            .render(area, buf);
    }
}
