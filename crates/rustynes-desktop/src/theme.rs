//! Custom `RustyNES` theme system with "Nostalgic Futurism" design.
//!
//! Colors follow the design specification from `RustyNES-UI_UX-Design-v2.md`:
//! - Console Black (#1A1A2E) - Primary background
//! - Deep Navy (#16213E) - Secondary background
//! - NES Blue (#0F3460) - Accent color
//! - Power Red (#E94560) - Primary action color
//! - Coral Accent (#FF6B6B) - Secondary action color

use iced::Color;
use serde::{Deserialize, Serialize};

/// Selectable application theme, persisted in [`crate::config::AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeVariant {
    /// "Nostalgic Futurism" dark theme (default).
    Dark,
    /// Light variant for bright environments.
    Light,
}

impl ThemeVariant {
    /// All selectable variants, in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Dark, Self::Light]
    }

    /// Convert to the underlying `iced::Theme`.
    #[must_use]
    pub fn to_iced_theme(self) -> iced::Theme {
        match self {
            Self::Dark => iced::Theme::Dark,
            Self::Light => iced::Theme::Light,
        }
    }
}

impl Default for ThemeVariant {
    fn default() -> Self {
        Self::Dark
    }
}

impl std::fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "Dark"),
            Self::Light => write!(f, "Light"),
        }
    }
}

/// Named accent colors drawn from [`RustyTheme`], for views that only need
/// a handful of colors rather than the full theme struct.
#[derive(Debug, Clone, Copy)]
pub struct RustyPalette {
    /// Primary action / title color (Power Red).
    pub primary: Color,
    /// Secondary accent color (Coral Accent).
    pub accent: Color,
    /// Primary background color (Console Black).
    pub background: Color,
}

impl RustyPalette {
    /// The "Nostalgic Futurism" dark palette.
    #[must_use]
    pub fn dark() -> Self {
        let theme = RustyTheme::dark();
        Self {
            primary: theme.power_red,
            accent: theme.coral_accent,
            background: theme.console_black,
        }
    }
}

/// Custom `RustyNES` theme palette
#[derive(Debug, Clone)]
#[allow(dead_code)] // Theme colors will be used in future UI components
pub struct RustyTheme {
    pub console_black: Color,
    pub deep_navy: Color,
    pub nes_blue: Color,
    pub power_red: Color,
    pub coral_accent: Color,
}

impl RustyTheme {
    /// Dark theme (default for "Nostalgic Futurism")
    pub fn dark() -> Self {
        Self {
            // #1A1A2E - Console Black
            console_black: Color::from_rgb(
                0x1A as f32 / 255.0,
                0x1A as f32 / 255.0,
                0x2E as f32 / 255.0,
            ),
            // #16213E - Deep Navy
            deep_navy: Color::from_rgb(
                0x16 as f32 / 255.0,
                0x21 as f32 / 255.0,
                0x3E as f32 / 255.0,
            ),
            // #0F3460 - NES Blue
            nes_blue: Color::from_rgb(
                0x0F as f32 / 255.0,
                0x34 as f32 / 255.0,
                0x60 as f32 / 255.0,
            ),
            // #E94560 - Power Red
            power_red: Color::from_rgb(
                0xE9 as f32 / 255.0,
                0x45 as f32 / 255.0,
                0x60 as f32 / 255.0,
            ),
            // #FF6B6B - Coral Accent
            coral_accent: Color::from_rgb(
                0xFF as f32 / 255.0,
                0x6B as f32 / 255.0,
                0x6B as f32 / 255.0,
            ),
        }
    }

    /// Glass morphism background color
    /// rgba(26, 26, 46, 0.7) with blur(20px) saturate(180%)
    #[allow(dead_code)] // Will be used for overlays and modals
    pub fn glass_background() -> Color {
        Color::from_rgba(
            0x1A as f32 / 255.0,
            0x1A as f32 / 255.0,
            0x2E as f32 / 255.0,
            0.7,
        )
    }
}

impl Default for RustyTheme {
    fn default() -> Self {
        Self::dark()
    }
}
