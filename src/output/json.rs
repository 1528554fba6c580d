//! JSON output formatter for machine processing
//!
//! Every report is one pretty-printed JSON document. Versions serialize as
//! the raw strings they were parsed from.

use crate::domain::{Distribution, InventoryDiff, PythonInstall};
use crate::inspect::{Field, FieldComparison, FieldValue};
use crate::output::{OutputFormatter, Verbosity};
use crate::version::{ComparisonResult, ParsedVersion, UpdateOrder, UpdateSet};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn write<T: Serialize>(&self, output: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(output).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

#[derive(Serialize)]
struct JsonPackage<'a> {
    name: &'a str,
    version: &'a ParsedVersion,
    /// Only in verbose mode
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

#[derive(Serialize)]
struct JsonPackages<'a> {
    python: &'a ParsedVersion,
    packages: Vec<JsonPackage<'a>>,
}

#[derive(Serialize)]
struct JsonValue<'a> {
    package: &'a str,
    field: String,
    value: &'a FieldValue,
}

#[derive(Serialize)]
struct JsonUpdates<'a> {
    package: &'a str,
    installed: &'a ParsedVersion,
    order: UpdateOrder,
    updates: &'a [ParsedVersion],
}

#[derive(Serialize)]
struct JsonComparison<'a> {
    package: &'a str,
    identical: bool,
    #[serde(flatten)]
    comparison: &'a ComparisonResult,
}

impl OutputFormatter for JsonFormatter {
    fn format_pythons(
        &self,
        pythons: &[PythonInstall],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write(&pythons, writer)
    }

    fn format_packages(
        &self,
        python: &PythonInstall,
        dists: &[Distribution],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let verbose = self.verbosity == Verbosity::Verbose;
        let packages = dists
            .iter()
            .map(|d| JsonPackage {
                name: &d.name,
                version: &d.version,
                location: verbose.then(|| d.site_packages.display().to_string()),
            })
            .collect();
        self.write(
            &JsonPackages {
                python: &python.version,
                packages,
            },
            writer,
        )
    }

    fn format_fields(&self, names: &[&str], writer: &mut dyn Write) -> std::io::Result<()> {
        self.write(&names, writer)
    }

    fn format_value(
        &self,
        package: &str,
        field: &Field,
        value: &FieldValue,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write(
            &JsonValue {
                package,
                field: field.to_string(),
                value,
            },
            writer,
        )
    }

    fn format_updates(
        &self,
        package: &str,
        updates: &UpdateSet,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write(
            &JsonUpdates {
                package,
                installed: updates.installed(),
                order: updates.order(),
                updates: updates.versions(),
            },
            writer,
        )
    }

    fn format_comparison(
        &self,
        package: &str,
        comparison: &ComparisonResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write(
            &JsonComparison {
                package,
                identical: comparison.is_identical(),
                comparison,
            },
            writer,
        )
    }

    fn format_field_comparison(
        &self,
        comparison: &FieldComparison,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write(comparison, writer)
    }

    fn format_diff(&self, diff: &InventoryDiff, writer: &mut dyn Write) -> std::io::Result<()> {
        self.write(diff, writer)
    }
}
