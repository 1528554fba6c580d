//! pkg-inspect - Python package inspector library
//!
//! This library provides:
//! - A version ordering engine for arbitrary Python version strings
//! - Discovery of installed interpreters and their distributions
//! - PyPI, GitHub and pypistats adapters
//! - Field-by-field package inspection and interpreter comparison

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod inspect;
pub mod output;
pub mod progress;
pub mod registry;
pub mod site;
pub mod version;
