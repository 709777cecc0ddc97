//! The requests view: every known log source as one row in a filterable,
//! selectable list.
//!
//! Entries report filter and selection changes to [`ViewState`] directly;
//! the [`ListWidget`] only owns ordering, geometry and the selection model.
//! The two paths meet here, where forced deselections are pushed back into
//! the model so both agree.

use std::collections::HashMap;

use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::list::{ListSignal, ListWidget, Uid};
use crate::netlog::{LogRecord, SourceId};
use crate::source_entry::{ColumnLayout, RowAction, SourceEntry, SourceView};

/// Aggregates reported by the entries.
#[derive(Debug, Default)]
pub struct ViewState {
    postfilter_count: usize,
    /// Selected sources, in the order they were selected.
    selection: Vec<SourceId>,
    filter: String,
    selection_generation: u64,
}

impl SourceView for ViewState {
    fn increment_postfilter_count(&mut self, delta: i32) {
        let count = self.postfilter_count.checked_add_signed(delta as isize);
        debug_assert!(count.is_some(), "postfilter count went negative");
        self.postfilter_count = count.unwrap_or(0);
    }

    fn modify_selection_array(&mut self, source_id: SourceId, selected: bool) {
        if selected {
            if !self.selection.contains(&source_id) {
                self.selection.push(source_id);
            }
        } else {
            self.selection.retain(|id| *id != source_id);
        }
    }

    fn on_selection_changed(&mut self) {
        self.selection_generation += 1;
        tracing::trace!(
            selected = self.selection.len(),
            generation = self.selection_generation,
            "Selection changed"
        );
    }

    fn current_filter_text(&self) -> &str {
        &self.filter
    }
}

pub struct RequestsView {
    list: ListWidget<SourceEntry>,
    /// Sources whose start record has not arrived yet.
    pending: HashMap<SourceId, SourceEntry>,
    uids: HashMap<SourceId, Uid>,
    state: ViewState,
    hovered: Option<Uid>,
    columns: ColumnLayout,
}

impl RequestsView {
    pub fn new(columns: ColumnLayout) -> Self {
        Self {
            list: ListWidget::new(),
            pending: HashMap::new(),
            uids: HashMap::new(),
            state: ViewState::default(),
            hovered: None,
            columns,
        }
    }

    pub fn list(&self) -> &ListWidget<SourceEntry> {
        &self.list
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn set_area(&mut self, area: Rect) {
        self.list.set_area(area);
    }

    pub fn postfilter_count(&self) -> usize {
        self.state.postfilter_count
    }

    /// Sources that have a row.
    pub fn total_sources(&self) -> usize {
        self.list.len()
    }

    pub fn pending_sources(&self) -> usize {
        self.pending.len()
    }

    pub fn selected_count(&self) -> usize {
        self.state.selection.len()
    }

    pub fn selection_generation(&self) -> u64 {
        self.state.selection_generation
    }

    pub fn filter_text(&self) -> &str {
        &self.state.filter
    }

    pub fn entry(&self, source_id: SourceId) -> Option<&SourceEntry> {
        match self.uids.get(&source_id) {
            Some(uid) => self.list.get(*uid),
            None => self.pending.get(&source_id),
        }
    }

    /// Selected entries in selection order.
    pub fn selected_entries(&self) -> Vec<&SourceEntry> {
        self.state
            .selection
            .iter()
            .filter_map(|id| self.entry(*id))
            .collect()
    }

    pub fn rect_for_context_menu(&self) -> Rect {
        self.list.rect_for_context_menu()
    }

    pub fn take_signals(&mut self) -> Vec<ListSignal> {
        self.list.take_signals()
    }

    /// Feed a batch of records. Returns how many sources materialized.
    pub fn on_log_records<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = LogRecord>,
    {
        self.list.start_batch_add();
        let mut materialized = 0;
        for record in records {
            if self.on_log_record(record) {
                materialized += 1;
            }
        }
        self.list.finish_batch_add();
        materialized
    }

    fn on_log_record(&mut self, record: LogRecord) -> bool {
        let source_id = record.source.id;
        if let Some(&uid) = self.uids.get(&source_id) {
            if let Some(entry) = self.list.get_mut(uid) {
                entry.append(record, &mut self.state);
            }
            return false;
        }

        let entry = self
            .pending
            .entry(source_id)
            .or_insert_with(|| SourceEntry::new(source_id));
        if !entry.append(record, &mut self.state) {
            return false;
        }

        let Some(entry) = self.pending.remove(&source_id) else {
            return false;
        };
        let index = self.insertion_index(source_id);
        let uid = if index == self.list.len() {
            self.list.add(entry)
        } else {
            self.list.add_at(entry, index)
        };
        self.uids.insert(source_id, uid);
        true
    }

    /// Rows are kept in source id order; ids mostly arrive increasing.
    fn insertion_index(&self, source_id: SourceId) -> usize {
        self.list.uids().partition_point(|uid| {
            self.list
                .get(*uid)
                .is_some_and(|entry| entry.source_id() < source_id)
        })
    }

    /// Re-run the filter over every row.
    pub fn set_filter(&mut self, text: &str) {
        if self.state.filter == text {
            return;
        }
        self.state.filter = text.to_string();

        for uid in self.list.uids().to_vec() {
            let Some(entry) = self.list.get_mut(uid) else {
                continue;
            };
            let matched = entry.matches_filter(&self.state.filter);
            entry.set_matched(matched, &mut self.state);
            if !matched {
                // The entry already dropped its selection; tell the model.
                self.list.set_item_selected(uid, false, &mut self.state);
            }
        }
        tracing::debug!(
            filter = %self.state.filter,
            shown = self.state.postfilter_count,
            "Filter applied"
        );
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        self.list.handle_key_down(key, &mut self.state)
    }

    pub fn handle_mouse(&mut self, event: &MouseEvent) {
        let target = self.list.item_at(event.column, event.row);
        match event.kind {
            MouseEventKind::Moved => self.set_hovered(target),
            MouseEventKind::Down(MouseButton::Left) if event.modifiers == KeyModifiers::NONE => {
                if let Some(uid) = target {
                    if self.row_action_at(uid, event.column) == Some(RowAction::ToggleSelection) {
                        let selected = self.list.get(uid).is_some_and(|e| e.is_selected());
                        self.list.set_item_selected(uid, !selected, &mut self.state);
                        return;
                    }
                }
                // Any other cell selects the row exclusively, which is what
                // the model does with a plain click.
                self.list.handle_pointer_event(event, &mut self.state);
            }
            _ => self.list.handle_pointer_event(event, &mut self.state),
        }
    }

    fn row_action_at(&self, uid: Uid, column: u16) -> Option<RowAction> {
        let bounds = self.list.item_bounds(uid)?;
        let offset = column.checked_sub(bounds.x)?;
        Some(self.columns.cell_at(offset).action())
    }

    fn set_hovered(&mut self, target: Option<Uid>) {
        if self.hovered == target {
            return;
        }
        if let Some(entry) = self.hovered.and_then(|uid| self.list.get_mut(uid)) {
            entry.set_hovered(false);
        }
        if let Some(entry) = target.and_then(|uid| self.list.get_mut(uid)) {
            entry.set_hovered(true);
        }
        self.hovered = target;
    }

    pub fn select_all(&mut self) {
        self.list.select_all(&mut self.state);
    }

    pub fn clear_selection(&mut self) {
        self.list.select_item(None, &mut self.state);
    }

    /// Remove every selected source. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.state.selection.clone();
        for id in &ids {
            self.remove_source(*id);
        }
        tracing::info!("Deleted {} selected sources", ids.len());
        ids.len()
    }

    fn remove_source(&mut self, source_id: SourceId) {
        if let Some(uid) = self.uids.remove(&source_id) {
            if self.hovered == Some(uid) {
                self.hovered = None;
            }
            if let Some(mut entry) = self.list.remove(uid) {
                entry.remove(&mut self.state);
            }
        } else if let Some(mut entry) = self.pending.remove(&source_id) {
            entry.remove(&mut self.state);
        }
    }

    /// Remove every source, materialized or not.
    pub fn delete_all(&mut self) {
        for uid in self.list.uids().to_vec() {
            if let Some(entry) = self.list.get_mut(uid) {
                entry.remove(&mut self.state);
            }
        }
        let removed = self.list.clear().len();
        for (_, mut entry) in self.pending.drain() {
            entry.remove(&mut self.state);
        }
        self.uids.clear();
        self.hovered = None;
        tracing::info!("Deleted all {} sources", removed);
    }
}
