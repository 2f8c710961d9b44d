//! # uth - Unit Test Helper
//!
//! uth records checks instead of aborting on the first failing one. Each
//! check is counted, optionally reported with its parameters, and the run
//! ends with an exit code that tells whether anything failed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uth::{check_eq, check_fn, check_op, App, Runner};
//!
//! fn is_even(n: i32) -> bool {
//!     n % 2 == 0
//! }
//!
//! #[uth::group]
//! fn arithmetic(runner: &mut Runner) {
//!     check_eq!(runner, 2 + 2, 4);
//!     check_eq!(runner, 0.1 + 0.2, 0.3, 1e-9);
//!     check_fn!(runner, is_even, 4);
//!     check_op!(runner, 3, <, 4);
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     App::new().run(|runner| {
//!         arithmetic(runner);
//!         Ok(())
//!     })
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Non-aborting checks**: every check is recorded and the run goes on
//! - **Nested groups**: per-group tallies rolled into their parent on end
//! - **Verbosity flags**: choose what is reported, from nothing to everything
//! - **Parameter display**: arguments are shown by name and value, through
//!   [`ToParamString`], `Display` or `Debug`
//! - **Pluggable reporters**: terminal, run log file and your own [`Reporter`]s
//! - **Seeded random values**: [`Runner::rand`] inputs that a run can replay
//!   through its reported seed
//!
//! ## Enumerations
//!
//! Fieldless enums report their integer discriminant with the derive:
//!
//! ```rust
//! #[derive(Debug, uth::ToParamString)]
//! enum Mode {
//!     Slow = 1,
//!     Fast = 3,
//! }
//!
//! use uth::ToParamString;
//! assert_eq!(Mode::Fast.to_param_string(), "3");
//! ```
//!
//! ## Without the CLI
//!
//! ```rust,no_run
//! use uth::{check, Runner};
//!
//! fn main() -> std::process::ExitCode {
//!     let mut runner = Runner::new();
//!     let group = runner.group("Strings", |runner| {
//!         check!(runner, "uth".len() == 3);
//!     });
//!     assert!(!group.local_failed);
//!     runner.finish()
//! }
//! ```

// The derive macros name items through `::uth`, also from within this crate.
extern crate self as uth;

mod app;

// Re-export procedural macros
pub use uth_derive::{group, ToParamString};

// Re-export error handling crates for user convenience
pub use eyre;
pub use pretty_assertions;

// Re-export main application struct
pub use app::{App, Color};

// Re-export core functionality
pub use uth_core::{
    assertion,
    config::{get_config, Config},
    equals::{equals, equals_eps, equals_slice, equals_slice_eps, Tolerance},
    param::{Param, ToParamString},
    random::Random,
    reporter::{
        Callbacks, ConsoleReporter, FileReporter, NullReporter, ReportContext, Reporter, Summary,
        Title, UserData,
    },
    runner::{self, Check, Options, Runner},
    Counter, Error, Group, Preset, Result, Verbosity,
    {
        check, check_eq, check_fn, check_fn_eq, check_method, check_method_eq, check_op,
        check_op_eq, check_slice_eq,
    },
};
