//! Status output for the CLI.
//!
//! Everything here writes to stderr; stdout carries only the assessment or
//! prompt text so it can be piped.

/// ANSI color codes for terminal styling
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const GREEN: &str = "\x1b[32m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
}

/// Check if colors should be enabled
pub fn colors_enabled() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return false;
    }
    atty::is(atty::Stream::Stderr)
}

/// Status line printer in cargo's style: `   Assessing intake.toml`
pub struct StatusPrinter {
    use_colors: bool,
}

impl StatusPrinter {
    pub fn new() -> Self {
        Self {
            use_colors: colors_enabled(),
        }
    }

    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    fn styled(&self, color: &str, bold: bool, text: &str) -> String {
        if self.use_colors {
            let bold_code = if bold { colors::BOLD } else { "" };
            format!("{}{}{}{}", bold_code, color, text, colors::RESET)
        } else {
            text.to_string()
        }
    }

    fn line(&self, color: &str, keyword: &str, message: &str) -> String {
        let keyword_styled = self.styled(color, true, &format!("{:>12}", keyword));
        format!("{} {}", keyword_styled, message)
    }

    pub fn status(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::BRIGHT_GREEN, keyword, message));
    }

    pub fn info(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::BRIGHT_CYAN, keyword, message));
    }

    pub fn warning(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::BRIGHT_YELLOW, keyword, message));
    }

    pub fn error(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::BRIGHT_RED, keyword, message));
    }

    pub fn success(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::GREEN, keyword, message));
    }

    /// Print a dim/secondary info line
    pub fn dim(&self, message: &str) {
        let msg = self.styled(colors::DIM, false, message);
        eprintln!("             {}", msg);
    }
}

impl Default for StatusPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress indicator styles
pub mod progress {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Duration;

    /// Spinner shown on stderr until the first token arrives
    pub fn create_spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
