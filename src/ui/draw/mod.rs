//! Drawing functions for the TUI
//!
//! - `requests` - filter bar, source list, details pane, status bar
//! - the context menu is drawn on top when open

mod requests;

use ratatui::Frame;

use crate::app::{App, AppMode};
use crate::ui::context_menu::ContextMenuWidget;

use requests::draw_requests;

/// Main draw function
pub fn draw(f: &mut Frame, app: &mut App) {
    if *app.mode() == AppMode::Exit {
        return;
    }

    draw_requests(f, app);

    if let AppMode::ContextMenu(menu) = app.mode() {
        let area = menu.popup_area(f.area());
        f.render_widget(ContextMenuWidget::new(menu, app.theme()), area);
    }
}
