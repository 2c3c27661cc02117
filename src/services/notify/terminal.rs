use std::io::{self, Write};

use owo_colors::OwoColorize;

use super::{Level, Notifier};

/// Prints notifications to stderr, coloured when `color` is set.
pub struct TerminalNotifier {
    color: bool,
}

impl TerminalNotifier {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn line(&self, level: Level, message: &str) -> String {
        match (level, self.color) {
            (Level::Success, true) => format!("{} {}", "✔".green().bold(), message.green()),
            (Level::Error, true) => format!("{} {}", "✖".red().bold(), message.red()),
            (Level::Success, false) => format!("✔ {message}"),
            (Level::Error, false) => format!("✖ {message}"),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, level: Level, message: &str) {
        let line = self.line(level, message);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines() {
        let notifier = TerminalNotifier::new(false);
        assert_eq!(notifier.line(Level::Success, "Booking cancelled"), "✔ Booking cancelled");
        assert_eq!(notifier.line(Level::Error, "Failed"), "✖ Failed");
    }
}
