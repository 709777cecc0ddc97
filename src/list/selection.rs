//! Selection models for [`ListWidget`](super::ListWidget).
//!
//! A model only knows items by [`Uid`]. It never calls back into the list;
//! instead it queues [`SelectionEvent`]s which the list drains after every
//! call it forwards, so only the currently bound model can ever deliver.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::Uid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionDelta {
    pub uid: Uid,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Ordered selection changes produced by one operation.
    Change(Vec<SelectionDelta>),
    LeadChange { old: Option<Uid>, new: Option<Uid> },
}

/// The navigable items, in display order, as the list sees them right now.
#[derive(Debug, Clone, Copy)]
pub struct ItemsView<'a> {
    /// Visible items only.
    pub order: &'a [Uid],
    /// Every item, hidden ones included. `order` is a subsequence of it.
    pub all: &'a [Uid],
    pub page_size: usize,
}

/// Where the lead sits relative to the visible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeadPosition {
    Missing,
    At(usize),
    /// The lead is hidden; `next` is the visible index just after it.
    Hidden { next: usize },
}

pub trait SelectionModel {
    fn add(&mut self, uid: Uid);
    fn remove(&mut self, uid: Uid);
    /// Forget everything, including queued events.
    fn clear(&mut self);

    fn handle_pointer_event(&mut self, event: &MouseEvent, target: Option<Uid>, items: ItemsView<'_>);
    /// Returns whether the key was consumed.
    fn handle_key_down(&mut self, event: &KeyEvent, items: ItemsView<'_>) -> bool;

    fn set_item_selected(&mut self, uid: Uid, selected: bool);
    /// Select exactly `uid` (or nothing) and make it the lead.
    fn set_selected_item(&mut self, uid: Option<Uid>);
    fn select_all(&mut self, items: ItemsView<'_>);

    fn selected_item(&self) -> Option<Uid>;
    fn selected_items(&self) -> Vec<Uid>;
    fn lead_item(&self) -> Option<Uid>;

    fn take_events(&mut self) -> Vec<SelectionEvent>;
}

/// Conventional multi-select list behaviour: click selects, Ctrl+click
/// toggles, Shift extends from the anchor.
#[derive(Debug, Default)]
pub struct ListSelectionModel {
    /// In the order items became selected.
    selected: Vec<Uid>,
    lead: Option<Uid>,
    anchor: Option<Uid>,
    events: Vec<SelectionEvent>,
}

impl ListSelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_selected(&self, uid: Uid) -> bool {
        self.selected.contains(&uid)
    }

    fn lead_position(&self, items: ItemsView<'_>) -> LeadPosition {
        let Some(lead) = self.lead else {
            return LeadPosition::Missing;
        };
        if let Some(index) = items.order.iter().position(|u| *u == lead) {
            return LeadPosition::At(index);
        }
        let Some(hidden) = items.all.iter().position(|u| *u == lead) else {
            return LeadPosition::Missing;
        };
        let mut next = 0;
        for uid in &items.all[..hidden] {
            if items.order.get(next) == Some(uid) {
                next += 1;
            }
        }
        LeadPosition::Hidden { next }
    }

    /// Replace the selection with `wanted`, queueing one change event with
    /// deselections first, then selections.
    fn select_exactly(&mut self, wanted: &[Uid]) {
        let mut deltas = Vec::new();
        self.selected.retain(|uid| {
            let keep = wanted.contains(uid);
            if !keep {
                deltas.push(SelectionDelta {
                    uid: *uid,
                    selected: false,
                });
            }
            keep
        });
        for &uid in wanted {
            if !self.selected.contains(&uid) {
                self.selected.push(uid);
                deltas.push(SelectionDelta {
                    uid,
                    selected: true,
                });
            }
        }
        self.push_change(deltas);
    }

    fn set_one(&mut self, uid: Uid, selected: bool) {
        if self.is_selected(uid) == selected {
            return;
        }
        if selected {
            self.selected.push(uid);
        } else {
            self.selected.retain(|u| *u != uid);
        }
        self.push_change(vec![SelectionDelta { uid, selected }]);
    }

    fn push_change(&mut self, deltas: Vec<SelectionDelta>) {
        if !deltas.is_empty() {
            self.events.push(SelectionEvent::Change(deltas));
        }
    }

    fn set_lead(&mut self, new: Option<Uid>) {
        if self.lead == new {
            return;
        }
        let old = std::mem::replace(&mut self.lead, new);
        self.events.push(SelectionEvent::LeadChange { old, new });
    }

    /// Move to `uid`; Shift extends from the anchor, otherwise the move
    /// selects `uid` alone and re-anchors.
    fn move_to(&mut self, uid: Uid, extend: bool, order: &[Uid]) {
        if extend {
            let anchor = self.anchor.unwrap_or(uid);
            let range = range_between(order, anchor, uid);
            self.select_exactly(&range);
            self.anchor = Some(anchor);
        } else {
            self.select_exactly(&[uid]);
            self.anchor = Some(uid);
        }
        self.set_lead(Some(uid));
    }
}

/// Inclusive run of `order` between two items, in display order.
fn range_between(order: &[Uid], a: Uid, b: Uid) -> Vec<Uid> {
    let pa = order.iter().position(|u| *u == a);
    let pb = order.iter().position(|u| *u == b);
    match (pa, pb) {
        (Some(pa), Some(pb)) => {
            let (lo, hi) = if pa <= pb { (pa, pb) } else { (pb, pa) };
            order[lo..=hi].to_vec()
        }
        _ => vec![b],
    }
}

impl SelectionModel for ListSelectionModel {
    fn add(&mut self, _uid: Uid) {
        // Uids are stable across insertions; a new item starts unselected.
    }

    fn remove(&mut self, uid: Uid) {
        self.selected.retain(|u| *u != uid);
        if self.lead == Some(uid) {
            self.lead = None;
        }
        if self.anchor == Some(uid) {
            self.anchor = None;
        }
    }

    fn clear(&mut self) {
        self.selected.clear();
        self.lead = None;
        self.anchor = None;
        self.events.clear();
    }

    fn handle_pointer_event(&mut self, event: &MouseEvent, target: Option<Uid>, items: ItemsView<'_>) {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let shift = event.modifiers.contains(KeyModifiers::SHIFT);

        match (event.kind, target) {
            (MouseEventKind::Down(MouseButton::Left), None) => {
                if !ctrl && !shift {
                    self.select_exactly(&[]);
                }
            }
            (MouseEventKind::Down(MouseButton::Left), Some(uid)) => {
                if shift {
                    self.move_to(uid, true, items.order);
                } else if ctrl {
                    let selected = self.is_selected(uid);
                    self.set_one(uid, !selected);
                    self.anchor = Some(uid);
                    self.set_lead(Some(uid));
                } else {
                    self.move_to(uid, false, items.order);
                }
            }
            // Right click keeps an existing selection so a context menu can act on it.
            (MouseEventKind::Down(MouseButton::Right), Some(uid)) => {
                if !self.is_selected(uid) {
                    self.move_to(uid, false, items.order);
                }
            }
            _ => {}
        }
    }

    fn handle_key_down(&mut self, event: &KeyEvent, items: ItemsView<'_>) -> bool {
        if event.kind == KeyEventKind::Release {
            return false;
        }
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let shift = event.modifiers.contains(KeyModifiers::SHIFT);

        match event.code {
            KeyCode::Char('a') if ctrl => {
                self.select_all(items);
                return true;
            }
            KeyCode::Char(' ') => {
                // A filtered-away lead cannot be toggled.
                let LeadPosition::At(index) = self.lead_position(items) else {
                    return false;
                };
                let lead = items.order[index];
                let selected = self.is_selected(lead);
                self.set_one(lead, !selected);
                self.anchor = Some(lead);
                return true;
            }
            _ => {}
        }

        if items.order.is_empty() {
            return false;
        }
        let last = items.order.len() - 1;
        let page = items.page_size.max(1);
        // A hidden lead keeps its place: stepping from it lands on its
        // visible neighbours.
        let position = self.lead_position(items);
        let step = |n: usize, forward: bool| match position {
            LeadPosition::At(i) if forward => (i + n).min(last),
            LeadPosition::At(i) => i.saturating_sub(n),
            LeadPosition::Hidden { next } if forward => (next + n - 1).min(last),
            LeadPosition::Hidden { next } => next.saturating_sub(n),
            LeadPosition::Missing => 0,
        };

        let index = match event.code {
            KeyCode::Up | KeyCode::Char('k') if !ctrl => step(1, false),
            KeyCode::Down | KeyCode::Char('j') if !ctrl => step(1, true),
            KeyCode::PageUp => step(page, false),
            KeyCode::PageDown => step(page, true),
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => return false,
        };

        self.move_to(items.order[index], shift, items.order);
        true
    }

    fn set_item_selected(&mut self, uid: Uid, selected: bool) {
        self.set_one(uid, selected);
    }

    fn set_selected_item(&mut self, uid: Option<Uid>) {
        match uid {
            Some(uid) => {
                self.select_exactly(&[uid]);
                self.anchor = Some(uid);
                self.set_lead(Some(uid));
            }
            None => self.select_exactly(&[]),
        }
    }

    fn select_all(&mut self, items: ItemsView<'_>) {
        self.select_exactly(items.order);
    }

    fn selected_item(&self) -> Option<Uid> {
        self.selected.first().copied()
    }

    fn selected_items(&self) -> Vec<Uid> {
        self.selected.clone()
    }

    fn lead_item(&self) -> Option<Uid> {
        self.lead
    }

    fn take_events(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.events)
    }
}
