//! Per-source row model.
//!
//! A [`SourceEntry`] accumulates every log record of one source. It stays
//! invisible until its start record arrives, at which point it builds its
//! row once and asks the filter whether to show it. Selection and filter
//! state changes are reported to a [`SourceView`].

pub mod row;

use crate::list::ListItem;
use crate::netlog::{LogRecord, SourceId};

pub use row::{ColumnLayout, RowAction, RowState, SourceRow};

/// The aggregate view a source entry reports to.
pub trait SourceView {
    fn increment_postfilter_count(&mut self, delta: i32);
    fn modify_selection_array(&mut self, source_id: SourceId, selected: bool);
    fn on_selection_changed(&mut self);
    fn current_filter_text(&self) -> &str;
}

#[derive(Debug)]
pub struct SourceEntry {
    source_id: SourceId,
    records: Vec<LogRecord>,
    /// Index of the start record once it exists.
    start: Option<usize>,
    row: Option<SourceRow>,
    is_selected: bool,
    is_matched_by_filter: bool,
    removed: bool,
}

/// The first record, unless it is a `REQUEST_ALIVE` wrapper, in which case
/// the record after it.
fn start_index(records: &[LogRecord]) -> Option<usize> {
    let first = records.first()?;
    if !first.is_wrapper() {
        return Some(0);
    }
    (records.len() >= 2).then_some(1)
}

impl SourceEntry {
    pub fn new(source_id: SourceId) -> Self {
        Self {
            source_id,
            records: Vec::new(),
            start: None,
            row: None,
            is_selected: false,
            is_matched_by_filter: false,
            removed: false,
        }
    }

    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn start_record(&self) -> Option<&LogRecord> {
        self.start.map(|i| &self.records[i])
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_materialized(&self) -> bool {
        self.row.is_some()
    }

    pub fn row(&self) -> Option<&SourceRow> {
        self.row.as_ref()
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn is_matched_by_filter(&self) -> bool {
        self.is_matched_by_filter
    }

    /// Append a record. Returns `true` when this record made the entry
    /// materialize, which happens at most once.
    pub fn append(&mut self, record: LogRecord, view: &mut dyn SourceView) -> bool {
        debug_assert!(!self.removed, "append to removed source {}", self.source_id);
        debug_assert_eq!(record.source.id, self.source_id);

        let had_start = self.start.is_some();
        self.records.push(record);
        self.start = start_index(&self.records);
        if had_start || self.start.is_none() {
            return false;
        }

        self.row = Some(SourceRow::new(
            self.source_id.to_string(),
            self.source_type_label(),
            self.description(),
        ));

        // The filter only looks at the start record, so evaluating it here
        // once is enough.
        let matched = self.matches_filter(view.current_filter_text());
        tracing::debug!(
            source_id = self.source_id,
            matched,
            "Source materialized"
        );
        self.set_matched(matched, view);
        true
    }

    /// Empty text matches everything; otherwise a case-insensitive substring
    /// test over the description and the source type.
    pub fn matches_filter(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }
        let needle = text.to_lowercase();
        self.description().to_lowercase().contains(&needle)
            || self.source_type_label().to_lowercase().contains(&needle)
    }

    pub fn set_matched(&mut self, matched: bool, view: &mut dyn SourceView) {
        if self.is_matched_by_filter == matched {
            return;
        }
        self.is_matched_by_filter = matched;

        if let Some(row) = self.row.as_mut() {
            row.set_displayed(matched);
        }

        if matched {
            view.increment_postfilter_count(1);
        } else {
            view.increment_postfilter_count(-1);
            // Filtered-away entries never stay selected.
            self.set_selected(false, view);
        }
    }

    pub fn set_selected(&mut self, selected: bool, view: &mut dyn SourceView) {
        if self.is_selected == selected {
            return;
        }
        debug_assert!(
            !selected || self.is_matched_by_filter,
            "selecting filtered-out source {}",
            self.source_id
        );
        self.is_selected = selected;

        if let Some(row) = self.row.as_mut() {
            row.set_selected(selected);
        }
        view.modify_selection_array(self.source_id, selected);
        view.on_selection_changed();
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        if let Some(row) = self.row.as_mut() {
            row.set_hovered(hovered);
        }
    }

    /// The start record's parameters as compact JSON, or empty.
    pub fn description(&self) -> String {
        self.start_record()
            .and_then(|record| record.extra_parameters.as_ref())
            .map(|params| params.to_string())
            .unwrap_or_default()
    }

    /// Name of the start record's source type, or empty before one exists.
    pub fn source_type_label(&self) -> &'static str {
        self.start_record()
            .map(|record| record.source.source_type.name())
            .unwrap_or("")
    }

    /// Deselect, unmatch and detach the row. The entry must not be used
    /// afterwards.
    pub fn remove(&mut self, view: &mut dyn SourceView) -> Option<SourceRow> {
        self.set_selected(false, view);
        self.set_matched(false, view);
        self.removed = true;
        self.row.take()
    }
}

impl ListItem for SourceEntry {
    type Context = dyn SourceView;

    fn set_selected(&mut self, selected: bool, cx: &mut Self::Context) {
        SourceEntry::set_selected(self, selected, cx);
    }

    fn set_lead(&mut self, lead: bool) {
        if let Some(row) = self.row.as_mut() {
            row.set_lead(lead);
        }
    }

    fn is_visible(&self) -> bool {
        self.row.as_ref().is_some_and(|row| row.is_displayed())
    }
}
