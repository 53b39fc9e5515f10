//! Theme palettes and terminal background detection

mod dark;
mod light;

use lectern_core::ThemeMode;

use crate::theme::Theme;

pub use dark::dark;
pub use light::light;

/// Resolve the palette for a theme mode
pub fn resolve(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => dark(),
        ThemeMode::Light => light(),
    }
}

/// Guess the terminal's color scheme from the `COLORFGBG` convention.
///
/// Terminals that export it use `<fg>;<bg>` (sometimes `<fg>;<default>;<bg>`)
/// with ANSI palette indices; 7 and 15 are the light backgrounds. Returns
/// `None` when the variable is absent or unparseable, in which case the caller
/// falls back to the fixed default.
pub fn detect_terminal_mode() -> Option<ThemeMode> {
    let value = std::env::var("COLORFGBG").ok()?;
    mode_from_colorfgbg(&value)
}

fn mode_from_colorfgbg(value: &str) -> Option<ThemeMode> {
    let bg = value.split(';').last()?.trim();
    let bg: u8 = bg.parse().ok()?;
    match bg {
        7 | 15 => Some(ThemeMode::Light),
        0..=6 | 8..=14 => Some(ThemeMode::Dark),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_backgrounds() {
        assert_eq!(mode_from_colorfgbg("0;15"), Some(ThemeMode::Light));
        assert_eq!(mode_from_colorfgbg("0;default;7"), Some(ThemeMode::Light));
    }

    #[test]
    fn test_dark_backgrounds() {
        assert_eq!(mode_from_colorfgbg("15;0"), Some(ThemeMode::Dark));
        assert_eq!(mode_from_colorfgbg("7;default;0"), Some(ThemeMode::Dark));
    }

    #[test]
    fn test_unparseable_values() {
        assert_eq!(mode_from_colorfgbg(""), None);
        assert_eq!(mode_from_colorfgbg("garbage"), None);
        assert_eq!(mode_from_colorfgbg("15;240"), None);
    }

    #[test]
    fn test_resolve_differs_by_mode() {
        let dark = resolve(ThemeMode::Dark);
        let light = resolve(ThemeMode::Light);
        assert_ne!(dark.bg0, light.bg0);
    }
}
