//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the reconciliation tools:
//! - Logging and tracing infrastructure
//! - Configuration management (credentials, endpoints, pacing constants)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the command line and the
//! provider depend on. It establishes the logging conventions and the
//! fail-fast configuration checks used throughout the system.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
