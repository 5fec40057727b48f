use crossterm::style::{Color, StyledContent, Stylize};

// Color palette
pub const PRIMARY: Color = Color::Rgb { r: 64, g: 128, b: 192 };
pub const SECONDARY: Color = Color::Rgb { r: 96, g: 160, b: 96 };
pub const ACCENT: Color = Color::Rgb { r: 192, g: 160, b: 64 };
pub const ERROR: Color = Color::Rgb { r: 192, g: 64, b: 64 };
pub const MUTED: Color = Color::Rgb { r: 128, g: 128, b: 128 };

// Styles
pub fn title(text: &str) -> StyledContent<String> {
    text.to_string().with(PRIMARY).bold()
}

pub fn muted(text: &str) -> StyledContent<String> {
    text.to_string().with(MUTED)
}

pub fn highlight(text: &str) -> StyledContent<String> {
    text.to_string().with(ACCENT)
}

pub fn success(text: &str) -> StyledContent<String> {
    text.to_string().with(SECONDARY)
}

pub fn error(text: &str) -> StyledContent<String> {
    text.to_string().with(ERROR).bold()
}

pub fn key(text: &str) -> StyledContent<String> {
    text.to_string().with(ACCENT).bold()
}
