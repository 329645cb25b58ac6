use ratatui::style::Color;

use crate::model::{Priority, UiConfig};
use crate::ops::filter::DueStatus;

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x11, 0x18, 0x27),
            text: Color::Rgb(0xD1, 0xD5, 0xDB),
            text_bright: Color::Rgb(0xF9, 0xFA, 0xFB),
            highlight: Color::Rgb(0x81, 0x8C, 0xF8),
            dim: Color::Rgb(0x6B, 0x72, 0x80),
            red: Color::Rgb(0xF8, 0x71, 0x71),
            yellow: Color::Rgb(0xFB, 0xBF, 0x24),
            green: Color::Rgb(0x34, 0xD3, 0x99),
            cyan: Color::Rgb(0x22, 0xD3, 0xEE),
            purple: Color::Rgb(0xC0, 0x84, 0xFC),
            blue: Color::Rgb(0x60, 0xA5, 0xFA),
            selection_bg: Color::Rgb(0x31, 0x2E, 0x81),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xF9, 0xFA, 0xFB),
            text: Color::Rgb(0x37, 0x41, 0x51),
            text_bright: Color::Rgb(0x11, 0x18, 0x27),
            highlight: Color::Rgb(0x4F, 0x46, 0xE5),
            dim: Color::Rgb(0x9C, 0xA3, 0xAF),
            red: Color::Rgb(0xDC, 0x26, 0x26),
            yellow: Color::Rgb(0xD9, 0x77, 0x06),
            green: Color::Rgb(0x05, 0x96, 0x69),
            cyan: Color::Rgb(0x08, 0x91, 0xB2),
            purple: Color::Rgb(0x93, 0x33, 0xEA),
            blue: Color::Rgb(0x25, 0x63, 0xEB),
            selection_bg: Color::Rgb(0xE0, 0xE7, 0xFF),
        }
    }

    /// Base palette for the mode, then `[ui.colors]` overrides on top.
    /// Overrides apply to both modes; unknown keys and bad hex are ignored.
    pub fn from_config(ui: &UiConfig, dark: bool) -> Self {
        let mut theme = if dark { Theme::dark() } else { Theme::light() };

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                _ => {}
            }
        }

        theme
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.red,
            Priority::Medium => self.yellow,
            Priority::Low => self.green,
        }
    }

    pub fn due_color(&self, status: DueStatus) -> Color {
        match status {
            DueStatus::Overdue => self.red,
            DueStatus::Today => self.yellow,
            DueStatus::Tomorrow => self.cyan,
            DueStatus::Later => self.dim,
        }
    }

    /// Configured categories cycle through a fixed palette in config order;
    /// anything else uses the text color.
    pub fn category_color(&self, category: &str, categories: &[String]) -> Color {
        let palette = [self.blue, self.green, self.red, self.purple, self.cyan, self.yellow];
        categories
            .iter()
            .position(|c| c == category)
            .map_or(self.text, |i| palette[i % palette.len()])
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
