use clap::{value_parser, Arg, ArgAction, ArgMatches, Command as ClapCommand};
use std::{ffi::OsString, path::PathBuf, process::ExitCode, str::FromStr};
use tracing::*;

use crate::{get_config, Check, Options, Param, Reporter, Runner, Verbosity};

/// Build the CLI with clap's builder pattern
fn build_cli() -> ClapCommand {
    ClapCommand::new("uth")
        .about("Run unit checks and report them on the terminal and in a log file")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(Arg::new("verbosity")
            .short('v')
            .long("verbosity")
            .help("Report verbosity: none, light, default, max, or a list of flags such as \"successes | group_end\" [env: UTH_VERBOSITY]")
            .value_parser(|s: &str| s.parse::<Verbosity>()))
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .help("Do not print reports on the terminal")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("log-file")
            .long("log-file")
            .help("Append reports to a log file created for this run")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("log-dir")
            .long("log-dir")
            .help("Directory of the log file. Default is \"Logs\" [env: UTH_LOG_DIR]")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("exit-on-failure")
            .long("exit-on-failure")
            .help("Terminate the run on the first failing check")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("seed")
            .long("seed")
            .help("Seed of the random values, to replay a previous run [env: UTH_SEED]")
            .value_parser(value_parser!(u64)))
        .arg(Arg::new("capture-rust")
            .long("capture-rust")
            .help("Capture Rust \"tracing\" based logs. This is useful when uth fails unexpectedly and you would want to see uth's internal logs")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("color")
            .long("color")
            .help("Produce color output. Default is \"auto\" [env: CARGO_TERM_COLOR]")
            .value_parser(["auto", "always", "never"]))
}

/// Apply command-line overrides on top of the configured options.
fn apply_overrides(matches: &ArgMatches, mut options: Options) -> Options {
    if let Some(verbosity) = matches.get_one::<Verbosity>("verbosity") {
        options.verbosity = *verbosity;
    }
    if matches.get_flag("quiet") {
        options.console_log = false;
    }
    if matches.get_flag("log-file") {
        options.file_log = true;
    }
    if let Some(dir) = matches.get_one::<PathBuf>("log-dir") {
        options.log_dir = dir.clone();
    }
    if matches.get_flag("exit-on-failure") {
        options.exit_on_failure = true;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        options.seed = Some(*seed);
    }
    options
}

fn apply_color(matches: &ArgMatches) {
    let color_command = matches
        .get_one::<String>("color")
        .and_then(|s| Color::from_str(s).ok());
    let color_env = std::env::var("CARGO_TERM_COLOR");
    let color = match (color_command, color_env) {
        (color @ Some(_), _) => color,
        (None, Ok(color)) => Color::from_str(&color).ok(),
        _ => None,
    };
    match color {
        Some(Color::Always) => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        }
        Some(Color::Never) => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        _ => {}
    }
}

/// uth CLI.
///
/// ```rust,no_run
/// use uth::{check_eq, App};
///
/// fn main() -> std::process::ExitCode {
///     App::new().run(|runner| {
///         check_eq!(runner, 1 + 1, 2);
///         Ok(())
///     })
/// }
/// ```
#[derive(Default)]
pub struct App {
    reporters: Vec<Box<dyn Reporter>>,
}

impl App {
    pub fn new() -> App {
        App {
            reporters: Vec::new(),
        }
    }

    /// Install a reporter invoked next to the console and file output.
    pub fn install_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.reporters.push(Box::new(reporter));
    }

    /// Parse command-line args, run `body` and turn the outcome into the process exit code.
    pub fn run(self, body: impl FnOnce(&mut Runner) -> eyre::Result<()>) -> ExitCode {
        ExitCode::from(self.run_from(std::env::args_os(), body))
    }

    /// [`App::run`] with explicit command-line args. Returns `0` when every
    /// check passed, `1` when one failed and `2` on invalid args.
    pub fn run_from<I, T>(self, args: I, body: impl FnOnce(&mut Runner) -> eyre::Result<()>) -> u8
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match build_cli().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) => {
                let _ = e.print();
                return if e.use_stderr() { 2 } else { 0 };
            }
        };

        if let Err(e) = color_eyre::install() {
            debug!("color-eyre was already installed: {e}");
        }
        if matches.get_flag("capture-rust") {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init();
        }
        apply_color(&matches);

        let options = apply_overrides(&matches, Options::from(get_config()));
        debug!("running with {options:?}");

        let mut runner = Runner::with_options(options);
        for reporter in self.reporters {
            runner.add_boxed_reporter(reporter);
        }

        if let Err(e) = body(&mut runner) {
            error!("test body returned an error: {e:#}");
            runner.check(
                Check {
                    description: "test body returned an error",
                    file: file!(),
                    line: line!(),
                },
                false,
                || vec![Param::new("error", format!("{e:?}"))],
            );
        }

        let status = runner.exit_status();
        let _ = runner.finish();
        u8::try_from(status).unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{check, check_eq, Callbacks};
    use std::{cell::RefCell, rc::Rc};
    use test_case::test_case;

    fn matches(args: &[&str]) -> ArgMatches {
        build_cli()
            .try_get_matches_from(std::iter::once("uth").chain(args.iter().copied()))
            .unwrap()
    }

    fn base() -> Options {
        Options {
            verbosity: Verbosity::DEFAULT,
            console_log: true,
            file_log: false,
            log_dir: PathBuf::from("Logs"),
            exit_on_failure: false,
            seed: None,
        }
    }

    #[test]
    fn no_overrides() {
        assert_eq!(apply_overrides(&matches(&[]), base()), base());
    }

    #[test_case(&["--verbosity", "light"] => Options { verbosity: Verbosity::LIGHT, ..base() }; "verbosity preset")]
    #[test_case(&["-v", "successes|group_end"] => Options { verbosity: Verbosity::SUCCESSES | Verbosity::GROUP_END, ..base() }; "verbosity flags")]
    #[test_case(&["--quiet"] => Options { console_log: false, ..base() }; "quiet")]
    #[test_case(&["--log-file", "--log-dir", "out"] => Options { file_log: true, log_dir: PathBuf::from("out"), ..base() }; "log file")]
    #[test_case(&["--exit-on-failure"] => Options { exit_on_failure: true, ..base() }; "exit on failure")]
    #[test_case(&["--seed", "1700000000"] => Options { seed: Some(1700000000), ..base() }; "seed")]
    fn overrides(args: &[&str]) -> Options {
        apply_overrides(&matches(args), base())
    }

    #[test_case(&["--seed", "-1"]; "negative seed")]
    #[test_case(&["--verbosity", "loud"]; "unknown verbosity")]
    #[test_case(&["--color", "sometimes"]; "unknown color")]
    #[test_case(&["--projects", "dev"]; "unknown flag")]
    fn invalid_args(args: &[&str]) {
        assert!(build_cli()
            .try_get_matches_from(std::iter::once("uth").chain(args.iter().copied()))
            .is_err());
    }

    #[test_case("auto" => matches Color::Auto; "auto")]
    #[test_case("always" => matches Color::Always; "always")]
    #[test_case("never" => matches Color::Never; "never")]
    fn color(s: &str) -> Color {
        Color::from_str(s).unwrap()
    }

    #[test]
    fn passing_run() {
        let status = App::new().run_from(["uth", "--quiet"], |runner| {
            check_eq!(runner, 1 + 1, 2);
            Ok(())
        });
        assert_eq!(status, 0);
    }

    #[test]
    fn failing_check_fails_the_run() {
        let status = App::new().run_from(["uth", "--quiet"], |runner| {
            check!(runner, false);
            check!(runner, true);
            Ok(())
        });
        assert_eq!(status, 1);
    }

    #[test]
    fn body_error_fails_the_run() {
        let titles = Rc::new(RefCell::new(Vec::new()));
        let mut app = App::new();
        app.install_reporter(Callbacks::new().with_title({
            let titles = titles.clone();
            move |title, _| titles.borrow_mut().push(title.description.to_string())
        }));

        let status = app.run_from(["uth", "--quiet"], |_| eyre::bail!("fixture missing"));

        assert_eq!(status, 1);
        assert_eq!(*titles.borrow(), vec!["test body returned an error".to_string()]);
    }

    #[test]
    fn invalid_args_do_not_run_the_body() {
        let mut ran = false;
        let status = App::new().run_from(["uth", "--verbosity", "loud"], |_| {
            ran = true;
            Ok(())
        });
        assert_eq!(status, 2);
        assert!(!ran);
    }
}
