//! Pass/fail tally shared by groups and the run as a whole.

use std::{fmt, ops::AddAssign};

/// Number of successful and failed checks.
///
/// Both fields only ever grow during a run. Merging two counters adds them
/// component-wise, so `Counter::default()` is the identity of [`Counter::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Counter {
    pub success: u32,
    pub failure: u32,
}

impl Counter {
    pub const fn new(success: u32, failure: u32) -> Counter {
        Counter { success, failure }
    }

    /// Count one result.
    pub fn update(&mut self, pred: bool) {
        if pred {
            self.success += 1;
        } else {
            self.failure += 1;
        }
    }

    pub fn merge(&mut self, other: Counter) {
        self.success += other.success;
        self.failure += other.failure;
    }

    pub const fn total(&self) -> u32 {
        self.success + self.failure
    }

    /// Returns true when nothing has been counted yet.
    pub const fn is_empty(&self) -> bool {
        self.success == 0 && self.failure == 0
    }
}

impl AddAssign for Counter {
    fn add_assign(&mut self, rhs: Counter) {
        self.merge(rhs);
    }
}

/// Renders `<total>`, or `<total> (<success>/<failure>)` once something failed.
impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.total())?;
        if self.failure > 0 {
            write!(f, " ({}/{})", self.success, self.failure)?;
        }
        Ok(())
    }
}
