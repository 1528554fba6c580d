//! Output formatting for inspection results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::domain::{Distribution, InventoryDiff, PythonInstall};
use crate::inspect::{Field, FieldComparison, FieldValue};
use crate::version::{ComparisonResult, UpdateSet};
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Bare values, one per line
    Quiet,
    #[default]
    Normal,
    /// Headers and paths alongside values
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool, no_color: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: !no_color,
        }
    }

    /// Whether a spinner may be drawn while remote calls run
    pub fn shows_progress(&self) -> bool {
        self.format == OutputFormat::Text && self.verbosity != Verbosity::Quiet
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    fn format_pythons(&self, pythons: &[PythonInstall], writer: &mut dyn Write)
        -> std::io::Result<()>;

    fn format_packages(
        &self,
        python: &PythonInstall,
        dists: &[Distribution],
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// The list of known field names
    fn format_fields(&self, names: &[&str], writer: &mut dyn Write) -> std::io::Result<()>;

    /// A single resolved field
    fn format_value(
        &self,
        package: &str,
        field: &Field,
        value: &FieldValue,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    fn format_updates(
        &self,
        package: &str,
        updates: &UpdateSet,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Installed versions of one package across two interpreters
    fn format_comparison(
        &self,
        package: &str,
        comparison: &ComparisonResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    fn format_field_comparison(
        &self,
        comparison: &FieldComparison,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    fn format_diff(&self, diff: &InventoryDiff, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}
