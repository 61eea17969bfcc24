use glimpse_types::ColorScheme;
use ratatui::style::Color;

/// The five style tokens every themed surface is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeBundle {
    pub text: Color,
    pub container_bg: Color,
    pub border: Color,
    pub button_bg: Color,
    pub button_text: Color,
}

/// Resolve the style bundle for the reported color scheme.
/// Pure function, safe to call on every render frame; an undetermined
/// scheme resolves to the dark bundle.
pub fn theme_for(scheme: Option<ColorScheme>) -> ThemeBundle {
    match scheme {
        Some(ColorScheme::Light) => ThemeBundle {
            text: Color::Rgb(0x24, 0x2c, 0x40),
            container_bg: Color::Rgb(0xf4, 0xf2, 0xee),
            border: Color::Rgb(0x00, 0x00, 0x00),
            button_bg: Color::Black,
            button_text: Color::White,
        },
        Some(ColorScheme::Dark) | None => ThemeBundle {
            text: Color::Rgb(0xf4, 0xf2, 0xee),
            container_bg: Color::Rgb(0x0d, 0x0d, 0x0d),
            border: Color::Rgb(0xb3, 0xb3, 0xb3),
            button_bg: Color::White,
            button_text: Color::Black,
        },
    }
}

/// Read the terminal's reported color preference.
///
/// `GLIMPSE_THEME` overrides; otherwise `COLORFGBG` ("fg;bg", set by
/// several terminal emulators) is consulted. Returns `None` when
/// neither is conclusive.
pub fn detect_color_scheme() -> Option<ColorScheme> {
    if let Ok(value) = std::env::var("GLIMPSE_THEME") {
        if let Some(scheme) = ColorScheme::parse(&value) {
            return Some(scheme);
        }
    }

    if let Ok(value) = std::env::var("COLORFGBG") {
        if let Some(bg) = value.rsplit(';').next() {
            return match bg.parse::<u8>() {
                Ok(7) | Ok(15) => Some(ColorScheme::Light),
                Ok(_) => Some(ColorScheme::Dark),
                Err(_) => None,
            };
        }
    }

    None
}
