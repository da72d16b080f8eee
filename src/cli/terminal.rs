//! Color and width helpers for CLI output.
//!
//! Color is applied only when stdout supports it, so piped output stays
//! plain.

use owo_colors::{colors::css, OwoColorize};

fn colored() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn width() -> usize {
    terminal_size::terminal_size().map_or(80, |(w, _)| usize::from(w.0))
}

/// Truncates a line to the terminal width, with an ellipsis.
///
/// `reserved` is the number of columns already taken on the line (indent,
/// markers). Falls back to 80 columns when the width is unknown, and
/// leaves very narrow terminals alone rather than truncating to nothing.
pub fn fit(text: &str, reserved: usize) -> String {
    let available = width().saturating_sub(reserved);
    if text.chars().count() <= available || available < 4 {
        return text.to_string();
    }
    let truncated: String = text.chars().take(available - 1).collect();
    format!("{truncated}…")
}

fn paint(text: &str, apply: impl FnOnce(&str) -> String) -> String {
    if colored() {
        apply(text)
    } else {
        text.to_string()
    }
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (gold)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), |text| {
            text.fg::<css::MediumSeaGreen>().to_string()
        })
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Gold>().to_string())
    }

    fn info(&self) -> String {
        paint(self.as_ref(), |text| {
            text.fg::<css::CornflowerBlue>().to_string()
        })
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), |text| text.dimmed().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_leaves_short_text_alone() {
        assert_eq!(fit("short line", 4), "short line");
    }

    #[test]
    fn fit_truncates_long_text_with_an_ellipsis() {
        let long = "x".repeat(500);
        let fitted = fit(&long, 0);

        assert!(fitted.chars().count() < long.chars().count());
        assert!(fitted.ends_with('…'));
    }

    #[test]
    fn fit_does_not_truncate_when_nothing_fits() {
        // With almost every column reserved there is no room for a
        // readable prefix, so the text passes through untouched.
        let long = "x".repeat(500);
        assert_eq!(fit(&long, usize::MAX), long);
    }
}
