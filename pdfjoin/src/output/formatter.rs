//! Human-readable status lines for the `pdfjoin` command.
//!
//! Regular output goes to stdout and is silenced by quiet mode. Warnings
//! go to stderr so they never mix with `--json` output on stdout.

use crate::config::Config;
use std::io::{self, IsTerminal};

/// Kind of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Plain progress text.
    Info,
    /// A step that completed.
    Success,
    /// Something the user should look at.
    Warning,
    /// Extra detail shown with `--verbose`.
    Debug,
}

impl MessageLevel {
    fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Info => ("", ""),
            Self::Success => ("✓ ", "\x1b[32m"),
            Self::Warning => ("⚠ ", "\x1b[33m"),
            Self::Debug => ("→ ", "\x1b[36m"),
        }
    }
}

/// Render `message` for `level`, optionally wrapped in ANSI colors.
pub fn render_message(level: MessageLevel, message: &str, colored: bool) -> String {
    let (prefix, color) = level.marker();
    if colored && !color.is_empty() {
        format!("{color}{prefix}{message}\x1b[0m")
    } else {
        format!("{prefix}{message}")
    }
}

/// Prints status lines according to the quiet and verbose settings.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter. Colors are used when stdout is a terminal.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Create a formatter from configuration.
    ///
    /// A dry run always prints its preview, even in quiet mode; JSON mode
    /// prints nothing.
    pub fn from_config(config: &Config) -> Self {
        Self::new(!config.should_print(), config.verbose && !config.json)
    }

    /// Formatter that prints nothing but warnings.
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Formatter that prints everything.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Print plain progress text.
    pub fn info(&self, message: &str) {
        self.print(MessageLevel::Info, message);
    }

    /// Print a completed step.
    pub fn success(&self, message: &str) {
        self.print(MessageLevel::Success, message);
    }

    /// Print a warning to stderr, even in quiet mode.
    pub fn warning(&self, message: &str) {
        eprintln!("{}", render_message(MessageLevel::Warning, message, self.colored));
    }

    /// Print extra detail, only in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print(MessageLevel::Debug, message);
        }
    }

    fn print(&self, level: MessageLevel, message: &str) {
        if !self.quiet {
            println!("{}", render_message(level, message, self.colored));
        }
    }

    /// Print a section title.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print `label: value`, only in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print an empty line.
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Print a numbered line; `index` is 1-based.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Whether regular output is shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Whether verbose output is shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Whether regular output is suppressed.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
