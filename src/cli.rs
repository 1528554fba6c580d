//! CLI argument parsing module for pkg-inspect

use crate::inspect::Operator;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Parse duration string in format: Nd (days), Nw (weeks), Nm (months)
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let (num_str, days_per_unit) = if let Some(n) = s.strip_suffix('d') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('w') {
        (n, 7)
    } else if let Some(n) = s.strip_suffix('m') {
        // months are 30 days
        (n, 30)
    } else {
        return Err(format!("invalid duration format: {}", s));
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in duration: {}", num_str))?;

    Ok(Duration::from_secs(num * days_per_unit * 24 * 60 * 60))
}

fn parse_operator(s: &str) -> Result<Operator, String> {
    s.parse().map_err(|e: crate::error::ConfigError| e.to_string())
}

/// Inspect installed and published Python packages
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pkg-inspect",
    version,
    about = "Inspect installed and published Python packages"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    // Output options
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - bare values only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug information to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    // Settings
    /// Settings file (TOML)
    #[arg(long, global = true, env = "PKG_INSPECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding interpreter installs (can be specified multiple times)
    #[arg(
        long = "python-root",
        global = true,
        env = "PKG_INSPECT_PYTHON_ROOT",
        value_delimiter = ':',
        action = ArgAction::Append
    )]
    pub python_roots: Vec<PathBuf>,

    /// PyPI base URL
    #[arg(long, global = true, hide = true, env = "PKG_INSPECT_PYPI_URL")]
    pub pypi_url: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true, hide = true, env = "PKG_INSPECT_GITHUB_URL")]
    pub github_url: Option<String>,

    /// pypistats.org base URL
    #[arg(long, global = true, hide = true, env = "PKG_INSPECT_PYPISTATS_URL")]
    pub pypistats_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List installed Python versions
    #[command(visible_alias = "installed-pythons")]
    Pythons,

    /// List the packages installed for a Python version
    #[command(visible_alias = "get-version-packages")]
    Packages {
        /// Python version (default: newest installed)
        #[arg(short, long)]
        python: Option<String>,
    },

    /// List the fields that can be inspected
    #[command(visible_alias = "options")]
    Fields,

    /// Inspect an installed package
    #[command(visible_alias = "inspect-package")]
    Inspect {
        package: String,

        /// Field name, or a file in the package's metadata directory
        #[arg(default_value = "metadata")]
        field: String,

        /// Python version (default: newest installed)
        #[arg(short, long)]
        python: Option<String>,
    },

    /// Inspect a package on PyPI without looking at local installs
    #[command(visible_alias = "inspect-pypi")]
    Pypi {
        package: String,

        #[arg(default_value = "latest_version")]
        field: String,
    },

    /// List versions newer than the installed one
    #[command(visible_alias = "get-available-updates")]
    Updates {
        package: String,

        /// Version to compare against (default: installed in the newest Python)
        #[arg(long, visible_alias = "current-version")]
        current: Option<String>,

        /// Include dev, alpha, beta and release candidate versions
        #[arg(long, visible_alias = "include-betas")]
        prereleases: bool,

        /// Include yanked releases
        #[arg(long)]
        yanked: bool,

        /// Only offer versions released at least this long ago (e.g., 2w, 10d, 1m)
        #[arg(long, value_parser = parse_duration)]
        age: Option<Duration>,

        /// Newest first
        #[arg(long)]
        descending: bool,
    },

    /// Compare a package between two Python versions
    #[command(visible_alias = "pkg-version-compare")]
    Compare {
        package: String,

        /// Field to compare instead of the installed versions
        field: Option<String>,

        /// First Python version
        #[arg(short, long)]
        source: String,

        /// Second Python version
        #[arg(short, long)]
        target: String,

        /// Check `source <op> target` (<, <=, ==, !=, >=, > or lt, le, eq, ne, ge, gt)
        #[arg(long, value_parser = parse_operator, requires = "field")]
        op: Option<Operator>,
    },

    /// Show package differences between two Python versions
    Diff {
        #[arg(short, long)]
        source: String,

        #[arg(short, long)]
        target: String,
    },
}

impl CliArgs {
    /// Whether the command talks to remote sources
    pub fn is_remote(&self) -> bool {
        matches!(
            self.command,
            Command::Inspect { .. } | Command::Pypi { .. } | Command::Updates { .. } | Command::Compare { field: Some(_), .. }
        )
    }
}
