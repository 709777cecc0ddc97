//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw/` - Screen layout and draw functions
//! - `theme.rs` - Color themes and presets
//! - `source_row.rs` - One-line row widget for a source
//! - `details.rs` - Record dump for selected sources
//! - `context_menu.rs` - Popup menu over the list

pub mod context_menu;
pub mod details;
mod draw;
pub mod source_row;
pub mod theme;

pub use draw::draw;
