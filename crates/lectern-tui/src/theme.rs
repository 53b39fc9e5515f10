use ratatui::style::Color;

/// Runtime color palette resolved from the active [`ThemeMode`]
///
/// [`ThemeMode`]: lectern_core::ThemeMode
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Semantic colors
    pub accent: Color,
    pub selection: Color,
    pub heading: Color,
    pub link: Color,
    pub quote: Color,
    pub error: Color,
    pub success: Color,
    pub info: Color,

    // Code block colors
    pub code_fg: Color,
    pub code_bg: Color,
    pub code_keyword: Color,
    pub code_string: Color,
    pub code_comment: Color,
    pub code_number: Color,
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::dark()
    }
}
