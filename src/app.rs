use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Config;
use crate::list::ListSignal;
use crate::netlog::ReaderEvent;
use crate::requests_view::RequestsView;
use crate::ui::context_menu::{ContextMenu, MenuAction};
use crate::ui::theme::Theme;

/// Application mode - determines how input is handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    /// Navigating and selecting rows
    Browsing,
    /// Typing into the filter bar
    Filtering,
    /// Popup menu open over the list
    ContextMenu(ContextMenu),
    /// Quit requested
    Exit,
}

/// Application state
pub struct App {
    mode: AppMode,
    view: RequestsView,
    config: Config,
    theme: Theme,
    /// Records received from the reader so far
    records_seen: usize,
    /// Reader reached end of input
    input_finished: bool,
    /// First visible line of the details pane
    details_scroll: u16,
}

impl App {
    pub fn new(config: Config, theme: Theme, initial_filter: Option<&str>) -> Self {
        let mut view = RequestsView::new(config.column_layout());
        if let Some(filter) = initial_filter {
            view.set_filter(filter);
        }
        Self {
            mode: AppMode::Browsing,
            view,
            config,
            theme,
            records_seen: 0,
            input_finished: false,
            details_scroll: 0,
        }
    }

    pub fn mode(&self) -> &AppMode {
        &self.mode
    }

    pub fn view(&self) -> &RequestsView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut RequestsView {
        &mut self.view
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    pub fn input_finished(&self) -> bool {
        self.input_finished
    }

    pub fn details_scroll(&self) -> u16 {
        self.details_scroll
    }

    pub fn should_quit(&self) -> bool {
        self.mode == AppMode::Exit
    }

    /// Ingest one drained batch from the reader. A read failure is fatal
    /// but records that arrived before it are kept.
    pub fn on_reader_events(&mut self, events: Vec<ReaderEvent>) -> Result<()> {
        let mut records = Vec::with_capacity(events.len());
        let mut failure = None;
        for event in events {
            match event {
                ReaderEvent::Record(record) => records.push(record),
                ReaderEvent::Eof { lines } => {
                    tracing::info!("Input finished after {} lines", lines);
                    self.input_finished = true;
                }
                ReaderEvent::Failed(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        self.records_seen += records.len();
        let materialized = self.view.on_log_records(records);
        if materialized > 0 {
            tracing::debug!(materialized, total = self.view.total_sources(), "New sources");
        }
        self.process_signals();

        match failure {
            Some(err) => Err(err).context("Failed to read net-log input"),
            None => Ok(()),
        }
    }

    fn process_signals(&mut self) {
        for signal in self.view.take_signals() {
            match signal {
                ListSignal::Change => self.details_scroll = 0,
            }
        }
    }

    // Filter

    pub fn is_filtering(&self) -> bool {
        self.mode == AppMode::Filtering
    }

    pub fn filter_text(&self) -> &str {
        self.view.filter_text()
    }

    pub fn start_filter(&mut self) {
        self.mode = AppMode::Filtering;
    }

    pub fn push_filter_char(&mut self, c: char) {
        let mut text = self.view.filter_text().to_string();
        text.push(c);
        self.view.set_filter(&text);
        self.process_signals();
    }

    /// Remove last character; an emptied filter leaves filter mode.
    pub fn pop_filter_char(&mut self) {
        let mut text = self.view.filter_text().to_string();
        text.pop();
        if text.is_empty() {
            self.mode = AppMode::Browsing;
        }
        self.view.set_filter(&text);
        self.process_signals();
    }

    pub fn clear_filter(&mut self) {
        self.view.set_filter("");
        self.mode = AppMode::Browsing;
        self.process_signals();
    }

    // Context menu

    pub fn open_context_menu(&mut self) {
        self.mode = AppMode::ContextMenu(ContextMenu::new(self.view.rect_for_context_menu()));
    }

    fn run_menu_action(&mut self, action: MenuAction) {
        tracing::debug!(?action, "Context menu action");
        match action {
            MenuAction::SelectAll => self.view.select_all(),
            MenuAction::ClearSelection => self.view.clear_selection(),
            MenuAction::DeleteSelected => {
                self.view.delete_selected();
            }
            MenuAction::DeleteAll => self.view.delete_all(),
        }
        self.details_scroll = 0;
        self.mode = AppMode::Browsing;
        self.process_signals();
    }

    // Input

    pub fn handle_key(&mut self, key: &KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.mode = AppMode::Exit;
            return;
        }
        match &mut self.mode {
            AppMode::Browsing => self.handle_browsing_key(key),
            AppMode::Filtering => self.handle_filter_key(key),
            AppMode::ContextMenu(menu) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => menu.previous(),
                KeyCode::Down | KeyCode::Char('j') => menu.next(),
                KeyCode::Enter => {
                    let action = menu.current();
                    self.run_menu_action(action);
                }
                KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => {
                    self.mode = AppMode::Browsing;
                }
                _ => {}
            },
            AppMode::Exit => {}
        }
        self.process_signals();
    }

    fn handle_browsing_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.view.selected_count() > 0 {
                    self.view.clear_selection();
                } else if !self.view.filter_text().is_empty() {
                    self.clear_filter();
                } else {
                    self.mode = AppMode::Exit;
                }
            }
            KeyCode::Char('q') => self.mode = AppMode::Exit,
            KeyCode::Char('/') => self.start_filter(),
            KeyCode::Char('m') => self.open_context_menu(),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.view.delete_selected();
            }
            KeyCode::Char('D') => self.view.delete_all(),
            KeyCode::Char('[') => self.details_scroll = self.details_scroll.saturating_sub(1),
            KeyCode::Char(']') => self.details_scroll = self.details_scroll.saturating_add(1),
            _ => {
                if self.view.handle_key(key) {
                    return;
                }
                if let KeyCode::Char(c) = key.code {
                    if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                        // Start filtering immediately on any char
                        self.start_filter();
                        self.push_filter_char(c);
                    }
                }
            }
        }
    }

    fn handle_filter_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => self.clear_filter(),
            KeyCode::Enter => self.mode = AppMode::Browsing,
            KeyCode::Backspace => self.pop_filter_char(),
            KeyCode::Up | KeyCode::Down => {
                self.view.handle_key(key);
            }
            KeyCode::Char(c) => self.push_filter_char(c),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, event: &MouseEvent) {
        if let AppMode::ContextMenu(_) = self.mode {
            if matches!(event.kind, MouseEventKind::Down(_)) {
                self.mode = AppMode::Browsing;
            }
            return;
        }

        self.view.handle_mouse(event);
        if event.kind == MouseEventKind::Down(MouseButton::Right) && self.view.selected_count() > 0 {
            self.open_context_menu();
        }
        self.process_signals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlog::{LogEventType, LogRecord, LogSourceType, ReadError};
    use ratatui::layout::Rect;
    use serde_json::json;

    fn app() -> App {
        let mut app = App::new(Config::default(), Theme::default(), None);
        app.view_mut().set_area(Rect::new(0, 0, 80, 20));
        app
    }

    fn record(id: u32, url: &str) -> ReaderEvent {
        ReaderEvent::Record(
            LogRecord::new(LogEventType::UrlRequestStart, id, LogSourceType::UrlRequest)
                .with_params(json!({ "url": url })),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_reader_events_feed_the_view() {
        let mut app = app();
        app.on_reader_events(vec![record(1, "http://a/"), record(2, "http://b/"), ReaderEvent::Eof { lines: 2 }])
            .unwrap();

        assert_eq!(app.records_seen(), 2);
        assert_eq!(app.view().total_sources(), 2);
        assert!(app.input_finished());
    }

    #[test]
    fn test_read_failure_keeps_earlier_records() {
        let mut app = app();
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let failed = ReaderEvent::Failed(ReadError::Malformed {
            origin: "<stdin>".into(),
            line: 2,
            source: err,
        });

        let result = app.on_reader_events(vec![record(1, "http://a/"), failed]);

        assert!(result.is_err());
        assert_eq!(app.view().total_sources(), 1);
    }

    #[test]
    fn test_typing_starts_filter() {
        let mut app = app();
        app.on_reader_events(vec![record(1, "http://alpha/"), record(2, "http://beta/")])
            .unwrap();

        app.handle_key(&press(KeyCode::Char('b')));
        app.handle_key(&press(KeyCode::Char('e')));

        assert!(app.is_filtering());
        assert_eq!(app.filter_text(), "be");
        assert_eq!(app.view().postfilter_count(), 1);

        app.handle_key(&press(KeyCode::Enter));
        assert_eq!(*app.mode(), AppMode::Browsing);
        assert_eq!(app.filter_text(), "be");
    }

    #[test]
    fn test_escape_unwinds_selection_then_filter_then_quits() {
        let mut app = app();
        app.on_reader_events(vec![record(1, "http://a/")]).unwrap();
        app.handle_key(&press(KeyCode::Char('/')));
        app.handle_key(&press(KeyCode::Char('a')));
        app.handle_key(&press(KeyCode::Enter));
        app.handle_key(&press(KeyCode::Down));
        assert_eq!(app.view().selected_count(), 1);

        app.handle_key(&press(KeyCode::Esc));
        assert_eq!(app.view().selected_count(), 0);
        assert!(!app.should_quit());

        app.handle_key(&press(KeyCode::Esc));
        assert_eq!(app.filter_text(), "");
        assert!(!app.should_quit());

        app.handle_key(&press(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_backspace_on_last_char_leaves_filter_mode() {
        let mut app = app();
        app.handle_key(&press(KeyCode::Char('/')));
        app.handle_key(&press(KeyCode::Char('x')));
        app.handle_key(&press(KeyCode::Backspace));
        assert_eq!(*app.mode(), AppMode::Browsing);
    }

    #[test]
    fn test_context_menu_runs_action() {
        let mut app = app();
        app.on_reader_events(vec![record(1, "http://a/"), record(2, "http://b/")])
            .unwrap();

        app.handle_key(&press(KeyCode::Char('m')));
        assert!(matches!(app.mode(), AppMode::ContextMenu(_)));
        app.handle_key(&press(KeyCode::Enter));

        assert_eq!(*app.mode(), AppMode::Browsing);
        assert_eq!(app.view().selected_count(), 2);

        app.handle_key(&press(KeyCode::Char('d')));
        assert_eq!(app.view().total_sources(), 0);
    }

    #[test]
    fn test_selection_change_resets_details_scroll() {
        let mut app = app();
        app.on_reader_events(vec![record(1, "http://a/"), record(2, "http://b/")])
            .unwrap();
        app.handle_key(&press(KeyCode::Char(']')));
        app.handle_key(&press(KeyCode::Char(']')));
        assert_eq!(app.details_scroll(), 2);

        app.handle_key(&press(KeyCode::Down));
        assert_eq!(app.details_scroll(), 0);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        let mut app = app();
        app.start_filter();
        app.handle_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
