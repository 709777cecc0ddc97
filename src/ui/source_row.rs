//! Row widget for one log source.
//!
//! Renders `› [x] id type description` on a single line, using the same
//! [`ColumnLayout`] the requests view hit-tests against.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::source_entry::row::LEAD_MARKER_WIDTH;
use crate::source_entry::{ColumnLayout, RowState, SourceRow};

/// Affordance markers drawn in the selection cell.
#[derive(Debug, Clone, Copy)]
pub struct Markers<'a> {
    pub selected: &'a str,
    pub unselected: &'a str,
}

pub struct SourceRowWidget<'a> {
    row: &'a SourceRow,
    theme: &'a Theme,
    columns: &'a ColumnLayout,
    markers: Markers<'a>,
}

impl<'a> SourceRowWidget<'a> {
    pub fn new(row: &'a SourceRow, theme: &'a Theme, columns: &'a ColumnLayout, markers: Markers<'a>) -> Self {
        Self {
            row,
            theme,
            columns,
            markers,
        }
    }
}

impl<'a> Widget for SourceRowWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let base = self.theme.row_style(self.row.state());
        buf.set_style(area, base);

        let right = area.x + area.width;
        let mut x = area.x;

        if self.row.is_lead() {
            buf.set_string(x, area.y, "›", base.fg(self.theme.accent));
        }
        x += LEAD_MARKER_WIDTH;

        let marker = if self.row.is_checked() {
            self.markers.selected
        } else {
            self.markers.unselected
        };
        let cells = [
            (marker, base, self.columns.selection - LEAD_MARKER_WIDTH),
            (self.row.id_text(), base, self.columns.id),
            (
                self.row.type_label(),
                base.fg(self.theme.tag_color(self.row.style_tag())),
                self.columns.source_type,
            ),
        ];
        for (text, style, width) in cells {
            if x >= right {
                return;
            }
            let avail = width.min(right - x).saturating_sub(1) as usize;
            buf.set_string(x, area.y, truncate(text, avail), style);
            x += width;
        }

        if x < right {
            let avail = (right - x) as usize;
            let style = if self.row.state() == RowState::Selected {
                base
            } else {
                base.fg(self.theme.dimmed).remove_modifier(Modifier::UNDERLINED)
            };
            buf.set_string(x, area.y, truncate(self.row.description(), avail), style);
        }
    }
}

/// Truncate to `max_width` display columns, ending in an ellipsis if cut.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        result.push(c);
        used += w;
    }
    result.push('…');
    result
}
