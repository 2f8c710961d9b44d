//! Output verbosity.
//!
//! Verbosity is a set of independent flags. A few presets cover the common
//! cases and can be named in `uth.toml`, in `UTH_VERBOSITY` or on the command
//! line:
//!
//! ```toml
//! verbosity = "light"
//! # or any combination of flags
//! verbosity = "successes | param_names | params_on_failure"
//! ```

use bitflags::bitflags;
use std::str::FromStr;

use crate::Error;

bitflags! {
    /// Which categories of report output are emitted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct Verbosity: u32 {
        /// Report passing checks, not only failing ones.
        const SUCCESSES = 1 << 0;
        /// Print parameter names in front of their values.
        const PARAM_NAMES = 1 << 1;
        /// Print parameter values of failing checks.
        const PARAMS_ON_FAILURE = 1 << 2;
        /// Print parameter values of passing checks.
        const PARAMS_ON_SUCCESS = 1 << 3;
        const GROUP_START = 1 << 4;
        const GROUP_END = 1 << 5;
        /// Print check counts on group end and group counts in the run summary.
        const GROUP_COUNTS = 1 << 6;

        const NONE = 0;
        const LIGHT = Self::PARAM_NAMES.bits() | Self::PARAMS_ON_FAILURE.bits() | Self::GROUP_END.bits();
        const DEFAULT = Self::SUCCESSES.bits()
            | Self::PARAM_NAMES.bits()
            | Self::PARAMS_ON_FAILURE.bits()
            | Self::GROUP_START.bits()
            | Self::GROUP_END.bits()
            | Self::GROUP_COUNTS.bits();
        const MAX = Self::DEFAULT.bits() | Self::PARAMS_ON_SUCCESS.bits();
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::DEFAULT
    }
}

/// Named verbosity presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Preset {
    None,
    Light,
    Default,
    Max,
}

impl From<Preset> for Verbosity {
    fn from(preset: Preset) -> Verbosity {
        match preset {
            Preset::None => Verbosity::NONE,
            Preset::Light => Verbosity::LIGHT,
            Preset::Default => Verbosity::DEFAULT,
            Preset::Max => Verbosity::MAX,
        }
    }
}

impl Verbosity {
    /// Whether a check with outcome `pred` is reported at all.
    pub fn reports(&self, pred: bool) -> bool {
        !pred || self.contains(Verbosity::SUCCESSES)
    }

    /// Whether the parameters of a check with outcome `pred` are reported.
    pub fn reports_params(&self, pred: bool) -> bool {
        if pred {
            self.contains(Verbosity::PARAMS_ON_SUCCESS)
        } else {
            self.contains(Verbosity::PARAMS_ON_FAILURE)
        }
    }
}

/// Accepts a preset name or a `|`-separated list of flag names, case-insensitively.
impl FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(preset) = Preset::from_str(s) {
            return Ok(preset.into());
        }

        bitflags::parser::from_str::<Verbosity>(&s.to_uppercase())
            .map_err(|_| Error::UnknownVerbosity(s.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case("none" => Verbosity::NONE; "none")]
    #[test_case("Light" => Verbosity::LIGHT; "light mixed case")]
    #[test_case("default" => Verbosity::DEFAULT; "default")]
    #[test_case("MAX" => Verbosity::MAX; "max upper case")]
    #[test_case("successes | group_end" => Verbosity::SUCCESSES | Verbosity::GROUP_END; "flag list")]
    #[test_case(" PARAM_NAMES " => Verbosity::PARAM_NAMES; "single flag")]
    fn parse(s: &str) -> Verbosity {
        s.parse().unwrap()
    }

    #[test_case("loud"; "unknown preset")]
    #[test_case("successes | shouting"; "unknown flag")]
    fn parse_error(s: &str) {
        assert!(matches!(
            s.parse::<Verbosity>(),
            Err(Error::UnknownVerbosity(_))
        ));
    }

    #[test]
    fn presets() {
        assert_eq!(
            Verbosity::LIGHT,
            Verbosity::PARAM_NAMES | Verbosity::PARAMS_ON_FAILURE | Verbosity::GROUP_END
        );
        assert!(Verbosity::DEFAULT.contains(Verbosity::GROUP_COUNTS));
        assert!(!Verbosity::DEFAULT.contains(Verbosity::PARAMS_ON_SUCCESS));
        assert_eq!(Verbosity::MAX, Verbosity::all());
        assert!(Verbosity::NONE.is_empty());
    }

    #[test]
    fn gating() {
        let quiet = Verbosity::PARAMS_ON_FAILURE;
        assert!(quiet.reports(false));
        assert!(!quiet.reports(true));
        assert!(quiet.reports_params(false));
        assert!(!quiet.reports_params(true));

        assert!(Verbosity::MAX.reports(true));
        assert!(Verbosity::MAX.reports_params(true));
        assert!(!Verbosity::NONE.reports_params(false));
    }
}
