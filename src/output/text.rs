//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Aligned package and interpreter listings
//! - Plain field values (headed by package and field in verbose mode)
//! - Update lists and interpreter comparisons with colored highlights

use crate::domain::{Distribution, InventoryDiff, PythonInstall};
use crate::inspect::{Field, FieldComparison, FieldValue};
use crate::output::{OutputFormatter, Verbosity};
use crate::version::{ComparisonResult, ParsedVersion, UpdateSet};
use colored::{ColoredString, Colorize};
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

fn join(versions: &[ParsedVersion]) -> String {
    versions
        .iter()
        .map(|v| v.raw())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_color(verbosity, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// `label: a, b, c`, skipped when empty
    fn write_versions(
        &self,
        label: &str,
        versions: &[ParsedVersion],
        style: impl Fn(&str) -> ColoredString,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if versions.is_empty() {
            return Ok(());
        }
        writeln!(writer, "  {}: {}", label, self.paint(&join(versions), style))
    }

    /// Single-line values go beside the label, others below it
    fn write_labeled(
        &self,
        label: &str,
        value: &FieldValue,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let text = value.to_string();
        let label = self.paint(label, |s| s.bold());
        if text.contains('\n') {
            writeln!(writer, "{}:", label)?;
            for line in text.lines() {
                writeln!(writer, "  {}", line)?;
            }
            Ok(())
        } else {
            writeln!(writer, "{}: {}", label, text)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_pythons(
        &self,
        pythons: &[PythonInstall],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for python in pythons {
            if self.verbosity == Verbosity::Quiet {
                writeln!(writer, "{}", python)?;
                continue;
            }
            let version = self.paint(&format!("{:<6}", python.version), |s| s.bold());
            for (i, site) in python.site_packages.iter().enumerate() {
                if i == 0 {
                    writeln!(writer, "{} {}", version, site.display())?;
                } else {
                    writeln!(writer, "{:<6} {}", "", site.display())?;
                }
            }
        }
        Ok(())
    }

    fn format_packages(
        &self,
        python: &PythonInstall,
        dists: &[Distribution],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            for dist in dists {
                writeln!(writer, "{}", dist.name)?;
            }
            return Ok(());
        }

        let header = format!("Python {} ({} packages)", python, dists.len());
        writeln!(writer, "{}", self.paint(&header, |s| s.bold()))?;
        let width = dists.iter().map(|d| d.name.len()).max().unwrap_or(0).max(20);
        for dist in dists {
            let version = self.paint(dist.version.raw(), |s| s.green());
            if self.verbosity == Verbosity::Verbose {
                let site = dist.site_packages.display().to_string();
                writeln!(
                    writer,
                    "  {:width$} {} {}",
                    dist.name,
                    version,
                    self.paint(&site, |s| s.dimmed()),
                    width = width
                )?;
            } else {
                writeln!(writer, "  {:width$} {}", dist.name, version, width = width)?;
            }
        }
        Ok(())
    }

    fn format_fields(&self, names: &[&str], writer: &mut dyn Write) -> std::io::Result<()> {
        for name in names {
            writeln!(writer, "{}", name)?;
        }
        Ok(())
    }

    fn format_value(
        &self,
        package: &str,
        field: &Field,
        value: &FieldValue,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Verbose {
            self.write_labeled(&format!("{} {}", package, field), value, writer)
        } else {
            writeln!(writer, "{}", value)
        }
    }

    fn format_updates(
        &self,
        package: &str,
        updates: &UpdateSet,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            for version in updates.versions() {
                writeln!(writer, "{}", version)?;
            }
            return Ok(());
        }

        let installed = updates.installed().raw();
        if updates.is_empty() {
            let latest = self.paint("up to date", |s| s.green());
            return writeln!(writer, "{} {} is {}", package, installed, latest);
        }

        let count = updates.len();
        writeln!(
            writer,
            "{} {}: {} {} available",
            self.paint(package, |s| s.bold()),
            self.paint(installed, |s| s.dimmed()),
            self.paint(&count.to_string(), |s| s.yellow()),
            if count == 1 { "update" } else { "updates" }
        )?;
        let arrow = if self.color { "→" } else { "->" };
        for version in updates.versions() {
            let label = self.paint(version.raw(), |s| s.bright_white());
            if version.is_prerelease() {
                writeln!(writer, "  {} {} {}", arrow, label, self.paint("(pre-release)", |s| s.dimmed()))?;
            } else {
                writeln!(writer, "  {} {}", arrow, label)?;
            }
        }
        Ok(())
    }

    fn format_comparison(
        &self,
        package: &str,
        comparison: &ComparisonResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let source = &comparison.source;
        let target = &comparison.target;
        writeln!(
            writer,
            "{}: {} vs {}",
            self.paint(package, |s| s.bold()),
            source.label,
            target.label
        )?;

        let installed = |versions: &[ParsedVersion]| {
            if versions.is_empty() {
                "not installed".to_string()
            } else {
                join(versions)
            }
        };
        writeln!(writer, "  {}: {}", source.label, installed(source.versions.as_slice()))?;
        writeln!(writer, "  {}: {}", target.label, installed(target.versions.as_slice()))?;

        if comparison.is_identical() {
            return writeln!(writer, "  {}", self.paint("identical", |s| s.green()));
        }

        self.write_versions(
            &format!("newer in {}", source.label),
            &comparison.newer_in_source,
            |s| s.green(),
            writer,
        )?;
        self.write_versions(
            &format!("newer in {}", target.label),
            &comparison.newer_in_target,
            |s| s.green(),
            writer,
        )?;
        self.write_versions(
            &format!("only in {}", source.label),
            &comparison.only_in_source,
            |s| s.yellow(),
            writer,
        )?;
        self.write_versions(
            &format!("only in {}", target.label),
            &comparison.only_in_target,
            |s| s.yellow(),
            writer,
        )?;
        if self.verbosity == Verbosity::Verbose {
            self.write_versions(
                &format!("between releases in {}", source.label),
                comparison.gaps_in_source(),
                |s| s.dimmed(),
                writer,
            )?;
            self.write_versions(
                &format!("between releases in {}", target.label),
                comparison.gaps_in_target(),
                |s| s.dimmed(),
                writer,
            )?;
        }
        Ok(())
    }

    fn format_field_comparison(
        &self,
        comparison: &FieldComparison,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Verbose {
            writeln!(writer, "{} {}", comparison.package, comparison.field)?;
        }
        if let (Some(op), Some(holds)) = (comparison.operator, comparison.holds) {
            if self.verbosity != Verbosity::Quiet {
                self.write_labeled(&comparison.source, &comparison.source_value, writer)?;
                self.write_labeled(&comparison.target, &comparison.target_value, writer)?;
            }
            let verdict = if holds {
                self.paint("true", |s| s.green())
            } else {
                self.paint("false", |s| s.red())
            };
            if self.verbosity == Verbosity::Quiet {
                return writeln!(writer, "{}", verdict);
            }
            return writeln!(
                writer,
                "{} {} {}: {}",
                comparison.source, op, comparison.target, verdict
            );
        }
        self.write_labeled(&comparison.source, &comparison.source_value, writer)?;
        self.write_labeled(&comparison.target, &comparison.target_value, writer)
    }

    fn format_diff(&self, diff: &InventoryDiff, writer: &mut dyn Write) -> std::io::Result<()> {
        if diff.is_empty() {
            return writeln!(
                writer,
                "{} and {} have the same {} packages",
                diff.source, diff.target, diff.unchanged
            );
        }

        let sides = [
            (&diff.source, &diff.only_in_source),
            (&diff.target, &diff.only_in_target),
        ];
        for (label, only) in sides {
            if only.is_empty() {
                continue;
            }
            let header = format!("Only in {} ({}):", label, only.len());
            writeln!(writer, "{}", self.paint(&header, |s| s.bold()))?;
            for package in only {
                writeln!(
                    writer,
                    "  {} {}",
                    package.name,
                    self.paint(package.version.raw(), |s| s.yellow())
                )?;
            }
        }

        if !diff.changed.is_empty() {
            let header = format!("Different versions ({}):", diff.changed.len());
            writeln!(writer, "{}", self.paint(&header, |s| s.bold()))?;
            let width = diff.changed.iter().map(|c| c.name.len()).max().unwrap_or(0);
            let arrow = if self.color { "→" } else { "->" };
            for delta in &diff.changed {
                let comparison = &delta.comparison;
                writeln!(
                    writer,
                    "  {:width$} {} {} {}",
                    delta.name,
                    join(comparison.source.versions.as_slice()),
                    arrow,
                    self.paint(&join(comparison.target.versions.as_slice()), |s| s.green()),
                    width = width
                )?;
            }
        }

        if self.verbosity != Verbosity::Quiet {
            writeln!(writer, "{} unchanged", diff.unchanged)?;
        }
        Ok(())
    }
}
