//! Color themes.
//!
//! A theme maps each [`RowState`] to a style and each source style tag to an
//! accent color, so rows never pick colors themselves.

use ratatui::style::{Color, Modifier, Style};

use crate::source_entry::RowState;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub hover_bg: Color,
    /// Borders, lead marker
    pub accent: Color,
    pub dimmed: Color,
    pub search_highlight: Color,
    // Per source-type accents
    pub url_request: Color,
    pub socket: Color,
    pub connection: Color,
    pub resolver: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::darkwall()
    }
}

impl Theme {
    pub fn darkwall() -> Self {
        Self {
            background: Color::Rgb(13, 17, 22),      // #0d1116
            foreground: Color::Rgb(229, 234, 241),   // #e5eaf1
            selection_bg: Color::Rgb(38, 52, 78),    // #26344e
            selection_fg: Color::Rgb(255, 255, 255), // #ffffff
            hover_bg: Color::Rgb(24, 30, 40),        // #181e28
            accent: Color::Rgb(180, 83, 9),          // #b45309
            dimmed: Color::Rgb(107, 114, 128),       // #6b7280
            search_highlight: Color::Rgb(245, 158, 11), // #f59e0b
            url_request: Color::Rgb(96, 165, 250),   // #60a5fa
            socket: Color::Rgb(52, 211, 153),        // #34d399
            connection: Color::Rgb(192, 132, 252),   // #c084fc
            resolver: Color::Rgb(251, 191, 36),      // #fbbf24
        }
    }

    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),      // nord0
            foreground: Color::Rgb(236, 239, 244),   // nord6
            selection_bg: Color::Rgb(76, 86, 106),   // nord3
            selection_fg: Color::Rgb(236, 239, 244), // nord6
            hover_bg: Color::Rgb(59, 66, 82),        // nord1
            accent: Color::Rgb(136, 192, 208),       // nord8
            dimmed: Color::Rgb(129, 161, 193),       // nord9
            search_highlight: Color::Rgb(235, 203, 139), // nord13
            url_request: Color::Rgb(94, 129, 172),   // nord10
            socket: Color::Rgb(163, 190, 140),       // nord14
            connection: Color::Rgb(180, 142, 173),   // nord15
            resolver: Color::Rgb(208, 135, 112),     // nord12
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            background: Color::Rgb(40, 40, 40),      // bg
            foreground: Color::Rgb(235, 219, 178),   // fg
            selection_bg: Color::Rgb(80, 73, 69),    // bg2
            selection_fg: Color::Rgb(251, 241, 199), // fg0
            hover_bg: Color::Rgb(60, 56, 54),        // bg1
            accent: Color::Rgb(215, 153, 33),        // yellow
            dimmed: Color::Rgb(146, 131, 116),       // gray
            search_highlight: Color::Rgb(250, 189, 47), // bright yellow
            url_request: Color::Rgb(131, 165, 152),  // bright blue
            socket: Color::Rgb(184, 187, 38),        // bright green
            connection: Color::Rgb(211, 134, 155),   // bright purple
            resolver: Color::Rgb(254, 128, 25),      // bright orange
        }
    }

    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "darkwall" | "default" => Some(Self::darkwall()),
            "nord" => Some(Self::nord()),
            "gruvbox" | "gruvbox-dark" => Some(Self::gruvbox()),
            _ => None,
        }
    }

    /// Base style of a row in the given state.
    pub fn row_style(&self, state: RowState) -> Style {
        match state {
            RowState::None => Style::default().fg(self.foreground).bg(self.background),
            RowState::Selected => Style::default()
                .fg(self.selection_fg)
                .bg(self.selection_bg)
                .add_modifier(Modifier::BOLD),
            RowState::Hovered => Style::default().fg(self.foreground).bg(self.hover_bg),
            RowState::Lead => Style::default()
                .fg(self.foreground)
                .bg(self.background)
                .add_modifier(Modifier::UNDERLINED),
        }
    }

    /// Accent for a row's `source_<TYPE>` style tag.
    pub fn tag_color(&self, tag: &str) -> Color {
        match tag.strip_prefix("source_").unwrap_or(tag) {
            "URL_REQUEST" => self.url_request,
            "SOCKET_STREAM" | "SOCKET" => self.socket,
            "CONNECT_JOB" | "SPDY_SESSION" => self.connection,
            "INIT_PROXY_RESOLVER" | "HOST_RESOLVER_IMPL_REQUEST" | "HOST_RESOLVER_IMPL_JOB" => {
                self.resolver
            }
            _ => self.dimmed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid color length (expected 3 or 6 hex digits)")]
    InvalidLength,
    #[error("invalid hex digit in color")]
    InvalidHex,
}

/// Parse `#rrggbb` or `#rgb` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Result<Color, ColorError> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| ColorError::InvalidHex)
    };

    match hex.len() {
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => Err(ColorError::InvalidLength),
    }
}
