//! Tests for the list widget

use super::*;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton};
use std::cell::RefCell;
use std::rc::Rc;

/// Minimal item that records every selection call into its context.
#[derive(Debug)]
struct TestItem {
    name: &'static str,
    selected: bool,
    lead: bool,
    visible: bool,
}

impl TestItem {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            selected: false,
            lead: false,
            visible: true,
        }
    }
}

impl ListItem for TestItem {
    type Context = Vec<(&'static str, bool)>;

    fn set_selected(&mut self, selected: bool, cx: &mut Self::Context) {
        self.selected = selected;
        cx.push((self.name, selected));
    }

    fn set_lead(&mut self, lead: bool) {
        self.lead = lead;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug, Default)]
struct ModelLog {
    added: Vec<Uid>,
    removed: Vec<Uid>,
    cleared: usize,
    keys: usize,
    /// Events the model hands out on its next `take_events`.
    queued: Vec<SelectionEvent>,
}

/// Model whose events are scripted by the test through its log.
struct ScriptedModel {
    log: Rc<RefCell<ModelLog>>,
    selected: Option<Uid>,
}

impl ScriptedModel {
    fn new() -> (Self, Rc<RefCell<ModelLog>>) {
        let log = Rc::new(RefCell::new(ModelLog::default()));
        let model = Self {
            log: log.clone(),
            selected: None,
        };
        (model, log)
    }
}

impl SelectionModel for ScriptedModel {
    fn add(&mut self, uid: Uid) {
        self.log.borrow_mut().added.push(uid);
    }
    fn remove(&mut self, uid: Uid) {
        self.log.borrow_mut().removed.push(uid);
    }
    fn clear(&mut self) {
        self.log.borrow_mut().cleared += 1;
    }
    fn handle_pointer_event(&mut self, _: &MouseEvent, _: Option<Uid>, _: ItemsView<'_>) {}
    fn handle_key_down(&mut self, event: &KeyEvent, _: ItemsView<'_>) -> bool {
        self.log.borrow_mut().keys += 1;
        event.code == KeyCode::Enter
    }
    fn set_item_selected(&mut self, _: Uid, _: bool) {}
    fn set_selected_item(&mut self, uid: Option<Uid>) {
        self.selected = uid;
    }
    fn select_all(&mut self, _: ItemsView<'_>) {}
    fn selected_item(&self) -> Option<Uid> {
        self.selected
    }
    fn selected_items(&self) -> Vec<Uid> {
        self.selected.into_iter().collect()
    }
    fn lead_item(&self) -> Option<Uid> {
        None
    }
    fn take_events(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.log.borrow_mut().queued)
    }
}

fn selects(uid: Uid) -> SelectionEvent {
    SelectionEvent::Change(vec![SelectionDelta {
        uid,
        selected: true,
    }])
}

fn list_with(names: &[&'static str]) -> (ListWidget<TestItem>, Vec<Uid>) {
    let mut list = ListWidget::new();
    let uids = names.iter().map(|n| list.add(TestItem::new(n))).collect();
    list.set_area(Rect::new(0, 0, 20, 6));
    (list, uids)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn test_uids_are_unique_and_never_reused() {
    let mut list: ListWidget<TestItem> = ListWidget::new();
    let x = list.add(TestItem::new("x"));
    let y = list.add(TestItem::new("y"));
    assert_ne!(x, y);

    list.remove(x);
    let z = list.add(TestItem::new("z"));
    assert_ne!(z, y);
    assert_ne!(z, x);
    assert_eq!(list.uids(), &[y, z]);
}

#[test]
fn test_add_at_inserts_in_position() {
    let (mut list, uids) = list_with(&["a", "c"]);
    let b = list.add_at(TestItem::new("b"), 1);
    let d = list.add_at(TestItem::new("d"), 99);

    assert_eq!(list.uids(), &[uids[0], b, uids[1], d]);
    let names: Vec<_> = list.iter().map(|(_, item)| item.name).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_add_and_remove_register_with_model() {
    let (model, log) = ScriptedModel::new();
    let mut list: ListWidget<TestItem> = ListWidget::with_model(Some(Box::new(model)));

    let a = list.add(TestItem::new("a"));
    let b = list.add_at(TestItem::new("b"), 0);
    let removed = list.remove(a).unwrap();

    assert_eq!(removed.name, "a");
    assert!(!list.contains(a));
    assert_eq!(log.borrow().added, vec![a, b]);
    assert_eq!(log.borrow().removed, vec![a]);
}

#[test]
fn test_clear_detaches_everything_and_resets_model() {
    let (model, log) = ScriptedModel::new();
    let mut list: ListWidget<TestItem> = ListWidget::with_model(Some(Box::new(model)));
    list.add(TestItem::new("a"));
    list.add(TestItem::new("b"));

    let detached = list.clear();

    assert_eq!(detached.iter().map(|i| i.name).collect::<Vec<_>>(), vec!["a", "b"]);
    assert!(list.is_empty());
    assert_eq!(log.borrow().cleared, 1);
}

#[test]
fn test_nested_batches_restore_on_outermost_finish() {
    let mut list: ListWidget<TestItem> = ListWidget::new();
    assert!(list.is_visible());

    list.start_batch_add();
    list.start_batch_add();
    assert!(!list.is_visible());

    list.finish_batch_add();
    assert!(!list.is_visible());
    list.finish_batch_add();
    assert!(list.is_visible());
}

#[test]
fn test_batch_restores_original_hidden_state() {
    let mut list: ListWidget<TestItem> = ListWidget::new();
    list.set_visible(false);

    list.start_batch_add();
    list.finish_batch_add();
    assert!(!list.is_visible());
}

#[test]
fn test_change_event_reflects_all_deltas_with_one_signal() {
    let (mut list, uids) = list_with(&["a", "b", "c"]);
    let mut cx = Vec::new();

    list.select_all(&mut cx);
    assert_eq!(cx, vec![("a", true), ("b", true), ("c", true)]);
    assert_eq!(list.take_signals(), vec![ListSignal::Change]);

    list.select_item(Some(uids[1]), &mut cx);
    assert_eq!(&cx[3..], &[("a", false), ("c", false)]);
    assert_eq!(list.take_signals(), vec![ListSignal::Change]);
    assert!(list.get(uids[1]).unwrap().selected);
}

#[test]
fn test_lead_change_moves_lead_flag() {
    let (mut list, uids) = list_with(&["a", "b"]);
    let mut cx = Vec::new();

    list.handle_key_down(&KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &mut cx);
    assert!(list.get(uids[0]).unwrap().lead);

    list.handle_key_down(&KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &mut cx);
    assert!(!list.get(uids[0]).unwrap().lead);
    assert!(list.get(uids[1]).unwrap().lead);
    assert_eq!(list.lead_item(), Some(uids[1]));
}

#[test]
fn test_key_down_result_comes_from_model() {
    let (model, log) = ScriptedModel::new();
    let mut list: ListWidget<TestItem> = ListWidget::with_model(Some(Box::new(model)));
    let mut cx = Vec::new();

    assert!(list.handle_key_down(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut cx));
    assert!(!list.handle_key_down(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), &mut cx));
    assert_eq!(log.borrow().keys, 2);
}

#[test]
fn test_bind_detaches_previous_model() {
    let (first, first_log) = ScriptedModel::new();
    let mut list: ListWidget<TestItem> = ListWidget::with_model(Some(Box::new(first)));
    let a = list.add(TestItem::new("a"));
    let b = list.add(TestItem::new("b"));
    let mut cx = Vec::new();

    // Pending on the old model when it is swapped out.
    first_log.borrow_mut().queued.push(selects(a));
    // Raised by the new model before it was bound.
    let (second, second_log) = ScriptedModel::new();
    second_log.borrow_mut().queued.push(selects(b));

    assert!(list.bind(Some(Box::new(second))).is_some());
    assert!(first_log.borrow().queued.is_empty());
    assert!(second_log.borrow().queued.is_empty());

    first_log.borrow_mut().queued.push(selects(a));
    list.handle_key_down(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut cx);

    assert_eq!(first_log.borrow().keys, 0);
    assert_eq!(second_log.borrow().keys, 1);
    assert!(cx.is_empty());
    assert!(list.take_signals().is_empty());
    assert!(!list.get(a).unwrap().selected);
    assert!(!list.get(b).unwrap().selected);

    // The bound model still delivers.
    second_log.borrow_mut().queued.push(selects(b));
    list.handle_key_down(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut cx);
    assert_eq!(cx, vec![("b", true)]);
    assert_eq!(list.take_signals(), vec![ListSignal::Change]);
}

#[test]
fn test_change_for_unknown_uid_is_skipped() {
    let (model, log) = ScriptedModel::new();
    let mut list: ListWidget<TestItem> = ListWidget::with_model(Some(Box::new(model)));
    let a = list.add(TestItem::new("a"));
    let mut cx = Vec::new();

    log.borrow_mut().queued.push(SelectionEvent::Change(vec![
        SelectionDelta {
            uid: Uid(999),
            selected: true,
        },
        SelectionDelta {
            uid: a,
            selected: true,
        },
    ]));
    list.handle_key_down(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), &mut cx);

    assert_eq!(cx, vec![("a", true)]);
    assert_eq!(list.take_signals(), vec![ListSignal::Change]);
}

#[test]
fn test_unbound_list_ignores_input() {
    let (mut list, _) = list_with(&["a"]);
    list.bind(None);
    let mut cx = Vec::new();

    assert!(!list.handle_key_down(&KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &mut cx));
    list.handle_pointer_event(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 1), &mut cx);
    assert!(cx.is_empty());
    assert_eq!(list.selected_item(), None);
}

#[test]
fn test_pointer_routes_to_item_under_cursor() {
    let (mut list, uids) = list_with(&["a", "b", "c"]);
    let mut cx = Vec::new();

    // Content starts at (1, 1); "b" is on line 2.
    list.handle_pointer_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 2), &mut cx);
    assert_eq!(list.selected_items(), vec![uids[1]]);
    assert_eq!(cx, vec![("b", true)]);

    // Release is forwarded but changes nothing.
    list.handle_pointer_event(&mouse(MouseEventKind::Up(MouseButton::Left), 3, 2), &mut cx);
    assert_eq!(cx.len(), 1);
}

#[test]
fn test_pointer_on_border_is_ignored() {
    let (mut list, uids) = list_with(&["a"]);
    let mut cx = Vec::new();
    list.select_item(Some(uids[0]), &mut cx);

    // Left border and bottom border: a plain click in the content would clear.
    list.handle_pointer_event(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 1), &mut cx);
    list.handle_pointer_event(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 5), &mut cx);
    assert_eq!(list.selected_items(), vec![uids[0]]);

    // Empty content below the items does reach the model.
    list.handle_pointer_event(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), &mut cx);
    assert!(list.selected_items().is_empty());
}

#[test]
fn test_hidden_items_are_skipped_by_layout() {
    let (mut list, uids) = list_with(&["a", "b", "c"]);
    list.get_mut(uids[0]).unwrap().visible = false;

    assert_eq!(list.visible_uids(), vec![uids[1], uids[2]]);
    assert_eq!(list.item_at(1, 1), Some(uids[1]));
    assert_eq!(list.item_bounds(uids[0]), None);
}

#[test]
fn test_lead_scrolls_into_view() {
    let names = ["a", "b", "c", "d", "e", "f", "g"];
    let (mut list, uids) = list_with(&names);
    let mut cx = Vec::new();

    // Four content lines.
    list.handle_key_down(&KeyEvent::new(KeyCode::End, KeyModifiers::NONE), &mut cx);
    assert_eq!(list.scroll_offset(), 3);
    assert_eq!(list.item_bounds(uids[6]).map(|r| r.y), Some(4));

    list.handle_key_down(&KeyEvent::new(KeyCode::Home, KeyModifiers::NONE), &mut cx);
    assert_eq!(list.scroll_offset(), 0);
}

#[test]
fn test_rect_for_context_menu() {
    let (mut list, uids) = list_with(&["a", "b"]);
    let mut cx = Vec::new();
    assert_eq!(list.rect_for_context_menu(), Rect::new(0, 0, 20, 6));

    list.select_item(Some(uids[1]), &mut cx);
    assert_eq!(list.rect_for_context_menu(), Rect::new(1, 2, 18, 1));
}
