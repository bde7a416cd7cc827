use colored::{Color, Colorize};

// ---------------------------------------------------------------------------
// Console tones
// ---------------------------------------------------------------------------

/// Presentation tone of a report line on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Clean result.
    Good,
    /// Problem found.
    Bad,
    /// Informational header.
    Muted,
    /// Section markers, undecorated.
    Plain,
}

impl Tone {
    fn color(self) -> Option<Color> {
        match self {
            Tone::Good => Some(Color::BrightGreen),
            Tone::Bad => Some(Color::BrightRed),
            Tone::Muted => Some(Color::White),
            Tone::Plain => None,
        }
    }
}

/// Decorate `text` for the console. Whether escape codes are emitted at all
/// follows `colored`'s global control (TTY, `NO_COLOR`, `--color`).
pub fn paint(text: &str, tone: Tone) -> String {
    match tone.color() {
        Some(color) => text.color(color).to_string(),
        None => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Color mode
// ---------------------------------------------------------------------------

/// When to color console output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Apply the mode to `colored`'s global switch. `Auto` keeps its own detection.
pub fn apply_mode(mode: ColorMode) {
    match mode {
        ColorMode::Auto => colored::control::unset_override(),
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
    }
}
