//! Configuration module for pdfjoin.
//!
//! This module holds the validated, normalized configuration that drives a
//! merge. The CLI builds a [`Config`] from its arguments; embedders can
//! construct one directly. It covers:
//! - Validation of argument combinations
//! - Reorder requests expressed as [`Move`]s
//! - Output naming and overwrite behavior
//! - Compression

use anyhow::{Context, Result, bail};

use crate::PdfJoinError;
use crate::io::DEFAULT_FILENAME;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - preserves exact stream content.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Drop unreferenced objects, then compress.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfJoinError;

    /// Parse compression level from `"none"`, `"standard"` or `"maximum"`,
    /// ignoring case.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfJoinError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Standard => "standard",
            Self::Maximum => "maximum",
        };
        f.write_str(name)
    }
}

/// A single reorder request: move the file at `from` to position `to`.
///
/// Indices are 0-based. The textual form used on the command line is
/// `FROM:TO` with 1-based positions, so `"3:1"` moves the third file to the
/// front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Current position of the file (0-based).
    pub from: usize,
    /// Target position of the file (0-based).
    pub to: usize,
}

impl Move {
    /// Create a move from 0-based indices.
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Parse a `FROM:TO` string of 1-based positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not two positive integers separated
    /// by a colon.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfjoin::config::Move;
    ///
    /// let mv = Move::parse("3:1").unwrap();
    /// assert_eq!(mv, Move::new(2, 0));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let Some((from, to)) = s.split_once(':') else {
            bail!("Invalid move: {s}. Expected format like '3:1'");
        };

        let from = parse_position(from)?;
        let to = parse_position(to)?;

        Ok(Self::new(from - 1, to - 1))
    }
}

fn parse_position(s: &str) -> Result<usize> {
    let position: usize = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid position: {}", s.trim()))?;

    if position == 0 {
        bail!("Positions must be positive (1-indexed)");
    }

    Ok(position)
}

impl FromStr for Move {
    type Err = PdfJoinError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s).map_err(|e| PdfJoinError::invalid_config(e.to_string()))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from + 1, self.to + 1)
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths, in selection order.
    pub inputs: Vec<PathBuf>,

    /// Reorder requests applied after intake, in order.
    pub moves: Vec<Move>,

    /// Directory the merged PDF is saved into.
    pub output_dir: PathBuf,

    /// File name of the merged PDF.
    pub output_name: String,

    /// Dry run mode - preview the merge without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Emit a JSON report instead of human-readable output.
    pub json: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            moves: Vec::new(),
            output_dir: PathBuf::from("."),
            output_name: DEFAULT_FILENAME.to_string(),
            dry_run: false,
            verbose: false,
            quiet: false,
            json: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
        }
    }
}

impl Config {
    /// Full path of the output file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The output name is empty or contains a path separator
    /// - The output path is one of the inputs
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        validate_output_name(&self.output_name)?;

        let output = self.output_path();
        for input in &self.inputs {
            if same_path(input, &output) {
                bail!(
                    "Output file cannot be the same as an input file: {}",
                    output.display()
                );
            }
        }

        Ok(())
    }

    /// Check if human-readable output should be displayed.
    pub fn should_print(&self) -> bool {
        (!self.quiet || self.dry_run) && !self.json
    }
}

/// Compare paths, ignoring `.` components.
fn same_path(a: &Path, b: &Path) -> bool {
    fn significant(path: &Path) -> impl Iterator<Item = Component<'_>> {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
    }
    significant(a).eq(significant(b))
}

/// Check that `name` is usable as a plain file name.
pub fn validate_output_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Output file name cannot be empty");
    }

    if name.contains(['/', '\\']) || name == "." || name == ".." {
        bail!("Output file name must not contain a path: {name}");
    }

    Ok(())
}
