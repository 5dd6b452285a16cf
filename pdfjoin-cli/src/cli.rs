//! CLI argument parsing for pdfjoin.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.

use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use pdfjoin::config::{CompressionLevel, Config, Move, OverwriteMode};
use pdfjoin::error::{PdfJoinError, Result};
use pdfjoin::io::DEFAULT_FILENAME;
use pdfjoin::utils::collect_paths_for_patterns;

/// Combine PDF files into a single document.
///
/// pdfjoin reads the selected files, optionally reorders them, and merges
/// all of their pages, in order, into one PDF. If any file cannot be
/// decoded, nothing is written.
#[derive(Parser, Debug)]
#[command(name = "pdfjoin")]
#[command(version)]
#[command(about = "Combine PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to merge (in order)
    ///
    /// Specify multiple files or use glob patterns. Files are merged in
    /// the order provided; the matches of a glob are taken in sorted order.
    ///
    /// Examples:
    ///   pdfjoin cover.pdf body.pdf
    ///   pdfjoin 'chapter*.pdf' -o book.pdf
    #[arg(value_name = "FILE", required_unless_present = "input_list")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "PDFJOIN_OUTPUT",
        default_value = DEFAULT_FILENAME
    )]
    pub output: PathBuf,

    /// Move the file at position FROM to position TO before merging
    ///
    /// Positions are 1-based and refer to the list as it stands when the
    /// move is applied. Repeat to apply several moves in order.
    ///
    /// Example:
    ///   pdfjoin a.pdf b.pdf c.pdf -m 3:1   # merges c, a, b
    #[arg(short = 'm', long = "move", value_name = "FROM:TO")]
    pub moves: Vec<Move>,

    /// Dry run - preview the merge without creating output
    ///
    /// Reads and decodes every input, then shows the files in merge order
    /// with their page counts.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show detailed information about each PDF
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression (preserves exact stream content)
    /// - standard: Compress uncompressed streams (default)
    /// - maximum: Drop unused objects, then compress
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        default_value = "standard",
        env = "PDFJOIN_COMPRESSION"
    )]
    pub compression: CompressionLevel,

    /// Read input file list from a file (one path per line)
    ///
    /// Lines starting with '#' and blank lines are skipped. Use '-' to read
    /// from stdin. Listed files are merged after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Print a JSON report instead of human-readable output
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// `inputs` are the already expanded input paths, see
    /// [`get_all_inputs`](Self::get_all_inputs).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output path has no file name
    /// - Configuration validation fails
    pub fn to_config(&self, inputs: Vec<PathBuf>) -> Result<Config> {
        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let (output_dir, output_name) = split_output(&self.output)?;

        let config = Config {
            inputs,
            moves: self.moves.clone(),
            output_dir,
            output_name,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
            overwrite_mode,
            compression: self.compression,
        };

        config.validate().map_err(|e| {
            PdfJoinError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(PdfJoinError::invalid_config("No input files specified"));
        }

        split_output(&self.output)?;
        Ok(())
    }

    /// Get all input paths including those from input-list file.
    ///
    /// Direct inputs are glob-expanded; paths from the input list are
    /// appended after them, as written.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid, the input list cannot be
    /// read, or no inputs remain.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = collect_paths_for_patterns(&self.inputs)?;

        if let Some(ref input_list_path) = self.input_list {
            let additional_inputs = read_input_list(input_list_path).await?;
            all_inputs.extend(additional_inputs);
        }

        if all_inputs.is_empty() {
            return Err(PdfJoinError::EmptyInput);
        }

        Ok(all_inputs)
    }
}

/// Split an output path into its directory and file name.
fn split_output(output: &Path) -> Result<(PathBuf, String)> {
    let name = output
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            PdfJoinError::invalid_config(format!(
                "Output path has no file name: {}",
                output.display()
            ))
        })?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((dir, name.to_string()))
}

/// Read input paths from a file, or from stdin if `path` is `-`.
async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    if path.as_os_str() == "-" {
        return parse_input_list(BufReader::new(tokio::io::stdin()), path).await;
    }

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| PdfJoinError::FailedToReadInputList {
            path: path.to_path_buf(),
            source: e,
        })?;

    parse_input_list(BufReader::new(file), path).await
}

/// Parse one path per line, skipping blank lines and `#` comments.
async fn parse_input_list<R>(reader: R, path: &Path) -> Result<Vec<PathBuf>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut paths = Vec::new();
    let mut line_number = 0;

    while let Some(line) =
        lines
            .next_line()
            .await
            .map_err(|e| PdfJoinError::FailedToReadInputList {
                path: path.to_path_buf(),
                source: e,
            })?
    {
        line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains('\0') {
            return Err(PdfJoinError::InvalidInputList {
                path: path.to_path_buf(),
                line_number,
                details: "Path contains a NUL byte".to_string(),
            });
        }

        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}
