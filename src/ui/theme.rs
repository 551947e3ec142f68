use ratatui::style::Color;

/// Colors used across the UI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    /// Primary accent (titles, selection).
    pub primary: Color,
    /// Lighter accent (sort indicators, active filters).
    pub light: Color,
    /// Lightest accent (header text on dark backgrounds).
    pub lightest: Color,
    /// Darker accent (borders).
    pub dark: Color,
    /// Darkest accent (selected column background).
    pub darkest: Color,
    /// Body text.
    pub text: Color,
    /// Secondary text.
    pub subtext: Color,
    /// Error text.
    pub error: Color,
    /// Series colors in legend order.
    pub series: [Color; 6],
}

/// The application theme.
static THEME: Theme = Theme {
    primary: Color::Rgb(0xFF, 0x69, 0xB4),
    light: Color::Rgb(0xFF, 0xAA, 0xD1),
    lightest: Color::Rgb(0xFF, 0xC6, 0xE1),
    dark: Color::Rgb(0xE7, 0x54, 0x9F),
    darkest: Color::Rgb(0xCF, 0x3E, 0x8A),
    text: Color::Rgb(0xEE, 0xEE, 0xF2),
    subtext: Color::Rgb(0x9A, 0x9A, 0xA8),
    error: Color::Rgb(0xF3, 0x8B, 0xA8),
    series: [
        Color::Rgb(0xFF, 0x69, 0xB4),
        Color::Rgb(0x89, 0xB4, 0xFA),
        Color::Rgb(0xA6, 0xE3, 0xA1),
        Color::Rgb(0xF9, 0xE2, 0xAF),
        Color::Rgb(0xCB, 0xA6, 0xF7),
        Color::Rgb(0x94, 0xE2, 0xD5),
    ],
};

/// Access the application theme.
#[must_use]
pub fn theme() -> &'static Theme {
    &THEME
}

/// Color of the series at legend position `index`.
#[must_use]
pub fn series_color(index: usize) -> Color {
    let th = theme();
    th.series[index % th.series.len()]
}
