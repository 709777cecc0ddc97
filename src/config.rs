use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::source_entry::ColumnLayout;
use crate::ui::theme::{parse_hex_color, Theme};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub appearance: AppearanceConfig,
    pub behavior: BehaviorConfig,
    pub columns: ColumnsConfig,
    pub colors: ColorOverrides,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset name: "darkwall", "nord", "gruvbox"
    pub theme: String,
    pub prompt: String,
    pub selected_marker: String,
    pub unselected_marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Keep reading after end of input
    pub follow: bool,
    /// Upper bound on records ingested between two frames
    pub max_records_per_frame: usize,
    /// Show the details pane for selected sources
    pub show_details: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub id_width: u16,
    pub type_width: u16,
}

/// Hex colors (`#rrggbb`) replacing single theme colors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub selection_bg: Option<String>,
    pub hover_bg: Option<String>,
    pub accent: Option<String>,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "darkwall".to_string(),
            prompt: "filter❯ ".to_string(),
            selected_marker: "[x]".to_string(),
            unselected_marker: "[ ]".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            follow: false,
            max_records_per_frame: 500,
            show_details: true,
        }
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            id_width: 8,
            type_width: 20,
        }
    }
}

impl Config {
    /// `~/.config/netlog-view/config.toml` (or the platform equivalent).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("netlog-view")
            .join("config.toml")
    }

    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            tracing::info!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn column_layout(&self) -> ColumnLayout {
        ColumnLayout::new(
            &[
                self.appearance.selected_marker.as_str(),
                self.appearance.unselected_marker.as_str(),
            ],
            self.columns.id_width,
            self.columns.type_width,
        )
    }

    /// Preset named in the config with any color overrides applied.
    pub fn resolve_theme(&self) -> Result<Theme> {
        let mut theme = Theme::from_preset(&self.appearance.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using default", self.appearance.theme);
            Theme::default()
        });

        let overrides = [
            (&self.colors.background, &mut theme.background, "background"),
            (&self.colors.foreground, &mut theme.foreground, "foreground"),
            (&self.colors.selection_bg, &mut theme.selection_bg, "selection_bg"),
            (&self.colors.hover_bg, &mut theme.hover_bg, "hover_bg"),
            (&self.colors.accent, &mut theme.accent, "accent"),
        ];
        for (value, slot, name) in overrides {
            if let Some(hex) = value {
                *slot = parse_hex_color(hex)
                    .with_context(|| format!("Invalid color for colors.{}", name))?;
            }
        }
        Ok(theme)
    }
}
