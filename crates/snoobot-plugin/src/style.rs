//! IRC text styling.
//!
//! Uses the mIRC control codes: `\x02` toggles bold and `\x03NN` starts a
//! foreground colour that the next bare `\x03` ends.

pub(crate) const BOLD: char = '\x02';
pub(crate) const COLOR: char = '\x03';

/// mIRC palette entries used in plugin output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Red,
    Orange,
    Yellow,
    LightPurple,
    Grey,
}

impl Color {
    /// Two-digit palette code.
    pub fn code(self) -> &'static str {
        match self {
            Color::Green => "03",
            Color::Red => "04",
            Color::Orange => "07",
            Color::Yellow => "08",
            Color::LightPurple => "13",
            Color::Grey => "14",
        }
    }
}

/// Wrap `text` in bold markers.
pub fn bold(text: &str) -> String {
    format!("{BOLD}{text}{BOLD}")
}

/// Colour `text` with a foreground colour.
pub fn color(text: &str, fg: Color) -> String {
    format!("{COLOR}{}{text}{COLOR}", fg.code())
}

/// A bold, coloured label such as `[NSFW]`.
pub fn badge(text: &str, fg: Color) -> String {
    bold(&color(text, fg))
}
