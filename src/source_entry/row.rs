//! The visual row owned by a materialized source entry.
//!
//! A row has four cells, left to right: the selection affordance, the source
//! id, the source type label and the description. It carries no styling of
//! its own; instead it exposes a [`RowState`] that the theme maps to a style.

use unicode_width::UnicodeWidthStr;

/// Display state of a row. Selection wins over the lead marker, which wins
/// over a pointer hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    None,
    Selected,
    Hovered,
    Lead,
}

impl RowState {
    fn derive(selected: bool, lead: bool, hovered: bool) -> Self {
        if selected {
            RowState::Selected
        } else if lead {
            RowState::Lead
        } else if hovered {
            RowState::Hovered
        } else {
            RowState::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCell {
    Selection,
    Id,
    SourceType,
    Description,
}

/// What a click on a cell asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Clear every other selection and select this row.
    SelectExclusive,
    /// Flip this row only, leaving other selections alone.
    ToggleSelection,
}

impl RowCell {
    pub fn action(self) -> RowAction {
        match self {
            RowCell::Selection => RowAction::ToggleSelection,
            RowCell::Id | RowCell::SourceType | RowCell::Description => RowAction::SelectExclusive,
        }
    }
}

/// Column widths shared by rendering and hit-testing. Each width includes
/// the one-column gap after the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub selection: u16,
    pub id: u16,
    pub source_type: u16,
}

/// Width of the lead marker drawn in front of the affordance.
pub const LEAD_MARKER_WIDTH: u16 = 2;

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::new(&["[ ]"], 8, 20)
    }
}

impl ColumnLayout {
    /// The affordance cell fits the widest of `markers`.
    pub fn new(markers: &[&str], id_width: u16, type_width: u16) -> Self {
        let marker_width = markers.iter().map(|m| m.width()).max().unwrap_or(0) as u16;
        Self {
            selection: LEAD_MARKER_WIDTH + marker_width + 1,
            id: id_width.max(2),
            source_type: type_width.max(4),
        }
    }

    /// Cell under a column offset measured from the row's left edge.
    pub fn cell_at(&self, offset: u16) -> RowCell {
        if offset < self.selection {
            RowCell::Selection
        } else if offset < self.selection + self.id {
            RowCell::Id
        } else if offset < self.selection + self.id + self.source_type {
            RowCell::SourceType
        } else {
            RowCell::Description
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceRow {
    id_text: String,
    type_label: &'static str,
    description: String,
    style_tag: String,
    displayed: bool,
    selected: bool,
    hovered: bool,
    lead: bool,
    state: RowState,
}

impl SourceRow {
    /// New rows start hidden; the filter decides whether they show.
    pub fn new(id_text: String, type_label: &'static str, description: String) -> Self {
        Self {
            id_text,
            type_label,
            description,
            style_tag: format!("source_{}", type_label),
            displayed: false,
            selected: false,
            hovered: false,
            lead: false,
            state: RowState::None,
        }
    }

    pub fn id_text(&self) -> &str {
        &self.id_text
    }

    pub fn type_label(&self) -> &'static str {
        self.type_label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn style_tag(&self) -> &str {
        &self.style_tag
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Affordance checked state mirrors selection.
    pub fn is_checked(&self) -> bool {
        self.selected
    }

    pub fn is_lead(&self) -> bool {
        self.lead
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub(crate) fn set_displayed(&mut self, displayed: bool) {
        self.displayed = displayed;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        self.refresh_state();
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
        self.refresh_state();
    }

    pub(crate) fn set_lead(&mut self, lead: bool) {
        self.lead = lead;
        self.refresh_state();
    }

    fn refresh_state(&mut self) {
        self.state = RowState::derive(self.selected, self.lead, self.hovered);
    }
}
