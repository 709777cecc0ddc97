//! Generic selectable list.
//!
//! `ListWidget` keeps an ordered collection of items, hands each a [`Uid`],
//! and owns the single bound [`SelectionModel`]. Pointer and keyboard input
//! are routed to the model; the model's change and lead events are reflected
//! back onto the items.
//!
//! Items receive selection changes through [`ListItem::set_selected`] along
//! with a caller-supplied context, which is how an item reaches whatever
//! aggregate view it reports to without the list knowing about it.

pub mod selection;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

pub use selection::{ItemsView, ListSelectionModel, SelectionDelta, SelectionEvent, SelectionModel};

/// Opaque item identifier, unique for the lifetime of one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(u64);

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait ListItem {
    type Context: ?Sized;

    fn set_selected(&mut self, selected: bool, cx: &mut Self::Context);
    fn set_lead(&mut self, lead: bool);

    /// Hidden items keep their place but take no space and cannot be hit.
    fn is_visible(&self) -> bool {
        true
    }
}

/// Aggregate notifications raised by the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSignal {
    /// The selection changed; one per model change event.
    Change,
}

pub struct ListWidget<T: ListItem> {
    order: Vec<Uid>,
    items: HashMap<Uid, T>,
    next_uid: u64,
    model: Option<Box<dyn SelectionModel>>,
    batch_count: usize,
    visible: bool,
    original_visible: Option<bool>,
    /// Outer area including the border.
    area: Rect,
    scroll: usize,
    signals: Vec<ListSignal>,
}

impl<T: ListItem> Default for ListWidget<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListItem> ListWidget<T> {
    /// A list bound to a [`ListSelectionModel`].
    pub fn new() -> Self {
        Self::with_model(Some(Box::new(ListSelectionModel::new())))
    }

    pub fn with_model(model: Option<Box<dyn SelectionModel>>) -> Self {
        let mut list = Self {
            order: Vec::new(),
            items: HashMap::new(),
            next_uid: 1,
            model: None,
            batch_count: 0,
            visible: true,
            original_visible: None,
            area: Rect::default(),
            scroll: 0,
            signals: Vec::new(),
        };
        list.bind(model);
        list
    }

    /// Swap the selection model. The previous model is detached (anything it
    /// still had queued is dropped) before the new one is attached, and is
    /// handed back to the caller. `None` disables selection.
    pub fn bind(&mut self, model: Option<Box<dyn SelectionModel>>) -> Option<Box<dyn SelectionModel>> {
        let mut previous = self.model.take();
        if let Some(old) = previous.as_mut() {
            let stale = old.take_events();
            if !stale.is_empty() {
                tracing::debug!("Dropped {} events from detached selection model", stale.len());
            }
        }

        self.model = model;
        if let Some(new) = self.model.as_mut() {
            // Events raised before binding were never ours to deliver.
            new.take_events();
        }
        tracing::debug!(bound = self.model.is_some(), "Selection model bound");
        previous
    }

    fn allocate_uid(&mut self) -> Uid {
        let uid = Uid(self.next_uid);
        self.next_uid += 1;
        uid
    }

    pub fn add(&mut self, item: T) -> Uid {
        let index = self.order.len();
        self.add_at(item, index)
    }

    /// Insert before the item currently at `index`; past the end appends.
    pub fn add_at(&mut self, item: T, index: usize) -> Uid {
        let uid = self.allocate_uid();
        let index = index.min(self.order.len());
        self.order.insert(index, uid);
        self.items.insert(uid, item);
        if let Some(model) = self.model.as_mut() {
            model.add(uid);
        }
        uid
    }

    /// Remove an item. The caller guarantees it is present.
    pub fn remove(&mut self, uid: Uid) -> Option<T> {
        debug_assert!(self.contains(uid), "removing unknown item {}", uid);
        if let Some(model) = self.model.as_mut() {
            model.remove(uid);
        }
        self.order.retain(|u| *u != uid);
        self.items.remove(&uid)
    }

    /// Detach every item and reset the selection model. Returns the detached
    /// items in display order.
    pub fn clear(&mut self) -> Vec<T> {
        let order = std::mem::take(&mut self.order);
        let detached = order
            .into_iter()
            .filter_map(|uid| self.items.remove(&uid))
            .collect();
        self.items.clear();
        if let Some(model) = self.model.as_mut() {
            model.clear();
        }
        self.scroll = 0;
        detached
    }

    /// Hide the list while a batch of items is added. Nests; only the
    /// outermost call records the visibility to restore.
    pub fn start_batch_add(&mut self) {
        if self.batch_count == 0 {
            self.original_visible = Some(self.visible);
            self.visible = false;
        }
        self.batch_count += 1;
    }

    pub fn finish_batch_add(&mut self) {
        debug_assert!(self.batch_count > 0, "finish_batch_add without start_batch_add");
        self.batch_count = self.batch_count.saturating_sub(1);
        if self.batch_count == 0 {
            if let Some(visible) = self.original_visible.take() {
                self.visible = visible;
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[allow(dead_code)] // Used in tests
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn uids(&self) -> &[Uid] {
        &self.order
    }

    pub fn contains(&self, uid: Uid) -> bool {
        self.items.contains_key(&uid)
    }

    pub fn get(&self, uid: Uid) -> Option<&T> {
        self.items.get(&uid)
    }

    pub fn get_mut(&mut self, uid: Uid) -> Option<&mut T> {
        self.items.get_mut(&uid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uid, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |uid| self.items.get(uid).map(|item| (*uid, item)))
    }

    /// Items that currently take up a line, in display order.
    pub fn visible_uids(&self) -> Vec<Uid> {
        self.iter()
            .filter(|(_, item)| item.is_visible())
            .map(|(uid, _)| uid)
            .collect()
    }

    pub fn take_signals(&mut self) -> Vec<ListSignal> {
        std::mem::take(&mut self.signals)
    }

    // Geometry

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.clamp_scroll();
    }

    /// The area inside the border, where items are laid out one per line.
    pub fn content_area(&self) -> Rect {
        Rect {
            x: self.area.x.saturating_add(1),
            y: self.area.y.saturating_add(1),
            width: self.area.width.saturating_sub(2),
            height: self.area.height.saturating_sub(2),
        }
    }

    fn page_size(&self) -> usize {
        self.content_area().height as usize
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max = self.visible_uids().len().saturating_sub(self.page_size());
        self.scroll = self.scroll.min(max);
    }

    fn scroll_into_view(&mut self, uid: Uid) {
        let Some(index) = self.visible_uids().iter().position(|u| *u == uid) else {
            return;
        };
        let page = self.page_size().max(1);
        if index < self.scroll {
            self.scroll = index;
        } else if index >= self.scroll + page {
            self.scroll = index + 1 - page;
        }
    }

    /// Visible items inside the scroll window with their line rectangles.
    pub fn viewport(&self) -> Vec<(Uid, Rect)> {
        let content = self.content_area();
        self.visible_uids()
            .into_iter()
            .skip(self.scroll)
            .take(content.height as usize)
            .enumerate()
            .map(|(line, uid)| {
                let rect = Rect {
                    x: content.x,
                    y: content.y + line as u16,
                    width: content.width,
                    height: 1,
                };
                (uid, rect)
            })
            .collect()
    }

    /// On-screen bounds of an item, if it is scrolled into view.
    pub fn item_bounds(&self, uid: Uid) -> Option<Rect> {
        self.viewport()
            .into_iter()
            .find(|(u, _)| *u == uid)
            .map(|(_, rect)| rect)
    }

    /// Item whose bounds contain the given cell.
    pub fn item_at(&self, column: u16, row: u16) -> Option<Uid> {
        self.viewport()
            .into_iter()
            .find(|(_, rect)| contains(*rect, column, row))
            .map(|(uid, _)| uid)
    }

    /// Anchor rectangle for a context menu: the selected item when it is on
    /// screen, otherwise the whole list.
    pub fn rect_for_context_menu(&self) -> Rect {
        self.selected_item()
            .and_then(|uid| self.item_bounds(uid))
            .unwrap_or(self.area)
    }

    // Selection

    pub fn selected_item(&self) -> Option<Uid> {
        self.model.as_ref().and_then(|m| m.selected_item())
    }

    pub fn selected_items(&self) -> Vec<Uid> {
        self.model
            .as_ref()
            .map(|m| m.selected_items())
            .unwrap_or_default()
    }

    #[allow(dead_code)] // Used in tests
    pub fn lead_item(&self) -> Option<Uid> {
        self.model.as_ref().and_then(|m| m.lead_item())
    }

    pub fn set_item_selected(&mut self, uid: Uid, selected: bool, cx: &mut T::Context) {
        if let Some(model) = self.model.as_mut() {
            model.set_item_selected(uid, selected);
        }
        self.dispatch_model_events(cx);
    }

    pub fn select_item(&mut self, uid: Option<Uid>, cx: &mut T::Context) {
        if let Some(model) = self.model.as_mut() {
            model.set_selected_item(uid);
        }
        self.dispatch_model_events(cx);
    }

    pub fn select_all(&mut self, cx: &mut T::Context) {
        let order = self.visible_uids();
        let page_size = self.page_size();
        if let Some(model) = self.model.as_mut() {
            model.select_all(ItemsView {
                order: &order,
                all: &self.order,
                page_size,
            });
        }
        self.dispatch_model_events(cx);
    }

    // Input routing

    /// Route a mouse press or release to the selection model. Presses on the
    /// border are ignored; wheel events scroll.
    pub fn handle_pointer_event(&mut self, event: &MouseEvent, cx: &mut T::Context) {
        if !contains(self.area, event.column, event.row) {
            return;
        }
        match event.kind {
            MouseEventKind::ScrollDown => {
                self.scroll_by(1);
                return;
            }
            MouseEventKind::ScrollUp => {
                self.scroll_by(-1);
                return;
            }
            MouseEventKind::Down(_) | MouseEventKind::Up(_) => {}
            _ => return,
        }
        if !contains(self.content_area(), event.column, event.row) {
            tracing::trace!("Pointer event on list border ignored");
            return;
        }

        let target = self.item_at(event.column, event.row);
        let order = self.visible_uids();
        let page_size = self.page_size();
        if let Some(model) = self.model.as_mut() {
            model.handle_pointer_event(
                event,
                target,
                ItemsView {
                    order: &order,
                    all: &self.order,
                    page_size,
                },
            );
        }
        self.dispatch_model_events(cx);
    }

    /// Forward a key press to the selection model and report whether it
    /// was handled.
    pub fn handle_key_down(&mut self, event: &KeyEvent, cx: &mut T::Context) -> bool {
        let order = self.visible_uids();
        let page_size = self.page_size();
        let handled = match self.model.as_mut() {
            Some(model) => model.handle_key_down(
                event,
                ItemsView {
                    order: &order,
                    all: &self.order,
                    page_size,
                },
            ),
            None => false,
        };
        self.dispatch_model_events(cx);
        handled
    }

    fn dispatch_model_events(&mut self, cx: &mut T::Context) {
        let events = match self.model.as_mut() {
            Some(model) => model.take_events(),
            None => return,
        };
        for event in events {
            match event {
                SelectionEvent::Change(deltas) => {
                    self.reflect_change(&deltas, cx);
                    self.signals.push(ListSignal::Change);
                }
                SelectionEvent::LeadChange { old, new } => self.reflect_lead(old, new),
            }
        }
    }

    fn reflect_change(&mut self, deltas: &[SelectionDelta], cx: &mut T::Context) {
        for delta in deltas {
            match self.items.get_mut(&delta.uid) {
                Some(item) => item.set_selected(delta.selected, cx),
                None => tracing::warn!("Selection change for unknown item {}", delta.uid),
            }
        }
    }

    fn reflect_lead(&mut self, old: Option<Uid>, new: Option<Uid>) {
        if let Some(item) = old.and_then(|uid| self.items.get_mut(&uid)) {
            item.set_lead(false);
        }
        if let Some(uid) = new {
            if let Some(item) = self.items.get_mut(&uid) {
                item.set_lead(true);
                self.scroll_into_view(uid);
            }
        }
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
