use std::fs;

use ratatui::style::{Color, Modifier, Style};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::engine::label::StyleClass;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Colors are `#rrggbb`, a ratatui color name, or `default` for the
/// terminal's own color.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub focused_bg: String,
    pub focused_fg: String,
    pub selected_bg: String,
    pub selected_fg: String,
    pub cloning: String,
    pub success: String,
    pub error_bg: String,
    pub error_fg: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        let user_theme_path = config::config_dir().join("themes").join(&filename);
        if let Ok(content) = fs::read_to_string(&user_theme_path) {
            if let Ok(theme) = toml::from_str::<Theme>(&content) {
                return Some(theme);
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }

    pub fn style(&self, class: StyleClass) -> Style {
        let c = &self.colors;
        match class {
            StyleClass::Normal => Style::default().fg(c.fg()).bg(c.bg()),
            StyleClass::Focused => Style::default().fg(c.focused_fg()).bg(c.focused_bg()),
            StyleClass::Selected => Style::default().fg(c.selected_fg()).bg(c.selected_bg()),
            StyleClass::Cloning => Style::default()
                .fg(c.cloning())
                .bg(c.bg())
                .add_modifier(Modifier::ITALIC),
            StyleClass::Success => Style::default().fg(c.success()).bg(c.bg()),
            StyleClass::Error => Style::default().fg(c.error_fg()).bg(c.error_bg()),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("terminal-default").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "default".to_string(),
            fg: "gray".to_string(),
            muted: "darkgray".to_string(),
            border: "darkgray".to_string(),
            header_bg: "default".to_string(),
            header_fg: "cyan".to_string(),
            focused_bg: "gray".to_string(),
            focused_fg: "black".to_string(),
            selected_bg: "cyan".to_string(),
            selected_fg: "black".to_string(),
            cloning: "yellow".to_string(),
            success: "green".to_string(),
            error_bg: "red".to_string(),
            error_fg: "black".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(value: &str) -> Color {
        match value.trim() {
            "" | "default" | "reset" => Color::Reset,
            other => other.parse::<Color>().unwrap_or(Color::Reset),
        }
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn focused_bg(&self) -> Color { Self::parse_color(&self.focused_bg) }
    pub fn focused_fg(&self) -> Color { Self::parse_color(&self.focused_fg) }
    pub fn selected_bg(&self) -> Color { Self::parse_color(&self.selected_bg) }
    pub fn selected_fg(&self) -> Color { Self::parse_color(&self.selected_fg) }
    pub fn cloning(&self) -> Color { Self::parse_color(&self.cloning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn error_bg(&self) -> Color { Self::parse_color(&self.error_bg) }
    pub fn error_fg(&self) -> Color { Self::parse_color(&self.error_fg) }
}
