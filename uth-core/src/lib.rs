//! # uth Core
//!
//! Core functionality of the uth unit-test helper.
//!
//! This crate provides the building blocks of uth:
//! - The [`Runner`], which records checks and keeps the run-wide tally
//! - Nested groups of checks and their pass/fail accounting
//! - Check macros such as [`check_eq!`] or [`check_fn!`]
//! - Configuration loading from `uth.toml` and `UTH_*` variables
//! - Report sinks: console, log file and user callbacks
//! - Seeded random values for test inputs
//!
//! ## Architecture (block diagram)
//!
//! ```text
//! +---------------------+      +---------------------+      +---------------------+
//! | check macros        | ---> | Runner              | ---> | reporters (sinks)   |
//! | check!, check_eq!   |      | counter + groups    |      | console/file/user   |
//! +---------------------+      +---------------------+      +---------------------+
//!            |                         ^
//!            v                         |
//! +---------------------+      +---------------------+
//! | param stringifying  |      | config + verbosity  |
//! | ToParamString       |      | uth.toml, UTH_*     |
//! +---------------------+      +---------------------+
//! ```
//!
//! Most users should use the main `uth` crate rather than importing `uth-core` directly.

#[doc(hidden)]
pub mod assertion;
pub mod config;
pub mod counter;
pub mod equals;
pub mod error;
pub mod group;
pub mod param;
pub mod random;
pub mod reporter;
pub mod runner;
pub mod verbosity;

// Re-export procedural macros
pub use uth_derive::group;

// Re-export error handling crates
pub use eyre;

pub use config::{get_config, Config};
pub use counter::Counter;
pub use equals::{equals, equals_eps, equals_slice, equals_slice_eps, Tolerance};
pub use error::{Error, Result};
pub use group::{Group, GroupStack};
pub use param::{Param, ToParamString};
pub use random::Random;
pub use reporter::{
    Callbacks, ConsoleReporter, FileReporter, LineSink, LogFile, NullReporter, ReportContext,
    Reporter, Summary, TextReporter, Title, UserData,
};
pub use runner::{Check, Options, Runner};
pub use verbosity::{Preset, Verbosity};
