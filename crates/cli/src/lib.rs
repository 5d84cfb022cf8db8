//! Command-line interface for textfeat.
//!
//! This crate provides CLI commands for featurizing texts, listing the
//! available featurizers, and managing the configuration file.

#![deny(missing_docs, unsafe_code)]

/// CLI command definitions and parsing.
pub mod commands;

/// CLI application entry point and configuration.
pub mod app;

/// Error types for CLI operations.
pub mod error;
