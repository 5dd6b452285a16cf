//! Output formatting and display for pdfjoin.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Previews of the selected files
//! - Merge summaries
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use pdfjoin::output::OutputFormatter;
//! use pdfjoin::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge operation");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::merge::MergeStatistics;
use crate::preview::{EntryPreview, PreviewReport, PreviewStatus};
use crate::utils::format_file_size;

/// One-line description of a preview, as shown in file listings.
pub fn describe_preview(preview: &EntryPreview) -> String {
    match &preview.status {
        PreviewStatus::Ready {
            page_count,
            version,
            ..
        } => format!(
            "{} ({} page(s), PDF {version}, {})",
            preview.name,
            page_count,
            format_file_size(preview.size)
        ),
        PreviewStatus::Failed { reason } => {
            format!("{} (unreadable: {reason})", preview.name)
        }
    }
}

/// Display the selected files in merge order.
pub fn display_preview_report(formatter: &OutputFormatter, report: &PreviewReport) {
    formatter.section("Files to merge:");
    for (index, preview) in report.previews.iter().enumerate() {
        formatter.list_item(index + 1, &describe_preview(preview));

        if let PreviewStatus::Ready {
            object_count,
            page_dimensions: Some((width, height)),
            ..
        } = &preview.status
        {
            formatter.detail("Objects", &object_count.to_string());
            formatter.detail("Page size", &format!("{width:.0} x {height:.0} pt"));
        }
    }
    formatter.blank_line();

    if report.failed > 0 {
        formatter.warning(&format!(
            "Warning: {} file(s) cannot be decoded; the merge will fail",
            report.failed
        ));
    }

    formatter.info(&format!(
        "Total: {} file(s), {} pages, {}",
        report.previews.len(),
        report.total_pages,
        report.format_total_size()
    ));
}

/// Display merge statistics to the user.
pub fn display_merge_statistics(formatter: &OutputFormatter, stats: &MergeStatistics) {
    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail("Output size", &stats.format_output_size());
    formatter.detail("Compression", &stats.compression.to_string());
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", stats.merge_time.as_secs_f64()),
    );
    for pages in &stats.pages_per_entry {
        formatter.debug(&format!("{}: {} page(s)", pages.name, pages.page_count));
    }
}
