//! The test-run context.
//!
//! A [`Runner`] owns all state of one run: the run-wide tally, the sticky
//! failure flag, the group stack, the active options and the report sinks.
//! Checks are recorded strictly in call order; nothing here is thread-safe and
//! nothing needs to be, a run is driven from a single thread.
use rand::distributions::uniform::SampleUniform;
use std::{path::PathBuf, process::ExitCode};
use tracing::*;

use crate::{
    config::get_config,
    random::Random,
    reporter::{ConsoleReporter, FileReporter, ReportContext, Reporter, Summary, Title, UserData},
    Config, Counter, Group, GroupStack, Param, Result, Verbosity,
};

/// Run options, usually taken from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub verbosity: Verbosity,
    pub console_log: bool,
    pub file_log: bool,
    pub log_dir: PathBuf,
    pub exit_on_failure: bool,
    /// Seed of [`Runner::rand`]. Picked from the clock when unset.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Options::from(&Config::default())
    }
}

impl From<&Config> for Options {
    fn from(cfg: &Config) -> Self {
        Options {
            verbosity: cfg.verbosity,
            console_log: cfg.console_log,
            file_log: cfg.file_log,
            log_dir: cfg.log_dir.clone(),
            exit_on_failure: cfg.exit_on_failure,
            seed: cfg.seed,
        }
    }
}

/// Call-site information of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check<'a> {
    /// The check as written.
    pub description: &'a str,
    /// Source path as given by `file!()`.
    pub file: &'static str,
    pub line: u32,
}

pub struct Runner {
    options: Options,
    counter: Counter,
    /// Set by the first failing check, never cleared.
    failed: bool,
    groups: GroupStack,
    console: ConsoleReporter,
    /// Opened on the first enable of file logging, kept until the run ends.
    file: Option<FileReporter>,
    reporters: Vec<Box<dyn Reporter>>,
    user_data: UserData,
    random: Random,
    /// Whether the sinks have been handed the seed yet.
    started: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Runner::with_options(Options::default())
    }
}

impl Runner {
    /// Create a runner configured from `uth.toml` and `UTH_*` variables.
    pub fn new() -> Runner {
        Runner::with_options(Options::from(get_config()))
    }

    pub fn with_options(options: Options) -> Runner {
        let file_log = options.file_log;
        let random = options.seed.map_or_else(Random::from_clock, Random::new);
        debug!(seed = random.seed(), "random values seeded");
        let mut runner = Runner {
            options: Options {
                file_log: false,
                ..options
            },
            counter: Counter::default(),
            failed: false,
            groups: GroupStack::new(),
            console: ConsoleReporter::stdout(),
            file: None,
            reporters: Vec::new(),
            user_data: UserData::default(),
            random,
            started: false,
        };
        if let Err(e) = runner.set_file_log(file_log) {
            error!("file logging disabled: {e}");
        }
        runner
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Takes effect for subsequent checks and groups.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.options.verbosity = verbosity;
    }

    pub fn verbosity(&self) -> Verbosity {
        self.options.verbosity
    }

    pub fn set_console_log(&mut self, enabled: bool) {
        self.options.console_log = enabled;
    }

    /// Enable or disable the run log file. The file is created on the first
    /// enable; later toggles reuse it.
    pub fn set_file_log(&mut self, enabled: bool) -> Result<()> {
        if enabled && self.file.is_none() {
            self.file = Some(FileReporter::open(&self.options.log_dir)?);
        }
        self.options.file_log = enabled;
        Ok(())
    }

    /// Directory of the run log file. Ignored once the file has been opened.
    pub fn set_log_dir(&mut self, dir: impl Into<PathBuf>) {
        if self.file.is_some() {
            warn!("log file already opened, log directory change ignored");
            return;
        }
        self.options.log_dir = dir.into();
    }

    pub fn set_exit_on_failure(&mut self, enabled: bool) {
        self.options.exit_on_failure = enabled;
    }

    /// Add a sink invoked in addition to the console and file output.
    pub fn add_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.reporters.push(Box::new(reporter));
    }

    pub fn add_boxed_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    pub fn user_data(&self) -> &UserData {
        &self.user_data
    }

    pub fn user_data_mut(&mut self) -> &mut UserData {
        &mut self.user_data
    }

    /// Run-wide tally of checks.
    pub fn counter(&self) -> Counter {
        self.counter
    }

    /// Tally of ended groups, one unit per group.
    pub fn group_counter(&self) -> Counter {
        self.groups.executed()
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// `0` while every check passed, `1` afterwards.
    pub fn exit_status(&self) -> i32 {
        i32::from(self.failed)
    }

    /// Seed of the run's random values.
    pub fn seed(&self) -> u64 {
        self.random.seed()
    }

    /// Random value in `[min, max)`, reproducible through the run's seed.
    /// An empty range yields `min`.
    pub fn rand<T>(&mut self, min: T, max: T) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        self.random.range(min, max)
    }

    pub fn rand_bool(&mut self) -> bool {
        self.random.boolean()
    }

    /// Number of open groups.
    pub fn depth(&self) -> usize {
        self.groups.depth()
    }

    /// Count a result without reporting it.
    pub fn record(&mut self, pred: bool) {
        self.counter.update(pred);
        self.groups.update(pred);
        if !pred {
            self.failed = true;
        }
    }

    /// Record and report one check and return its outcome.
    ///
    /// `params` is only called when the parameters are actually reported.
    pub fn check(
        &mut self,
        check: Check<'_>,
        pred: bool,
        params: impl FnOnce() -> Vec<Param>,
    ) -> bool {
        self.record(pred);

        let verbosity = self.options.verbosity;
        if verbosity.reports(pred) && self.has_sinks() {
            let depth = self.groups.depth();
            let title = Title {
                description: check.description,
                file: file_name(check.file),
                line: check.line,
                pred,
            };
            self.dispatch(depth, |sink, cx| sink.on_title(&title, cx));
            if verbosity.reports_params(pred) {
                let params = params();
                self.dispatch(depth, |sink, cx| sink.on_params(&params, cx));
            }
            self.dispatch(depth, |sink, cx| sink.on_result(pred, cx));
        }

        if !pred && self.options.exit_on_failure {
            self.abort();
        }
        pred
    }

    pub fn group_begin(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.options.verbosity.contains(Verbosity::GROUP_START) {
            let depth = self.groups.depth();
            self.dispatch(depth, |sink, cx| sink.on_group_begin(&name, cx));
        }
        self.groups.begin(name);
    }

    /// End the innermost group and return its final tally.
    pub fn try_group_end(&mut self) -> Result<Group> {
        let group = self.groups.end()?;
        if self.options.verbosity.contains(Verbosity::GROUP_END) {
            let depth = self.groups.depth();
            self.dispatch(depth, |sink, cx| sink.on_group_end(&group, cx));
        }
        Ok(group)
    }

    /// End the innermost group and return its final tally.
    ///
    /// # Panics
    ///
    /// Panics when no group is open.
    pub fn group_end(&mut self) -> Group {
        self.try_group_end().unwrap_or_else(|e| panic!("{e}"))
    }

    /// Run `f` inside a group named `name`.
    pub fn group(&mut self, name: impl Into<String>, f: impl FnOnce(&mut Runner)) -> Group {
        self.group_begin(name);
        f(self);
        self.group_end()
    }

    /// Report the run summary, close all sinks and turn the outcome into an exit code.
    pub fn finish(mut self) -> ExitCode {
        if !self.groups.is_empty() {
            warn!("{} group(s) still open at the end of the run", self.groups.depth());
        }

        let summary = Summary {
            checks: self.counter,
            groups: self.groups.executed(),
            failed: self.failed,
        };
        self.dispatch(0, |sink, cx| sink.on_finish(&summary, cx));
        self.close();

        debug!(checks = %summary.checks, groups = %summary.groups, "run finished");
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    fn has_sinks(&self) -> bool {
        self.options.console_log
            || (self.options.file_log && self.file.is_some())
            || !self.reporters.is_empty()
    }

    fn dispatch(
        &mut self,
        depth: usize,
        mut hook: impl FnMut(&mut dyn Reporter, &mut ReportContext<'_>) -> eyre::Result<()>,
    ) {
        let Runner {
            options,
            console,
            file,
            reporters,
            user_data,
            random,
            started,
            ..
        } = self;

        let mut sinks: Vec<&mut dyn Reporter> = Vec::with_capacity(reporters.len() + 2);
        if options.console_log {
            sinks.push(console);
        }
        if options.file_log {
            if let Some(file) = file.as_mut() {
                sinks.push(file);
            }
        }
        sinks.extend(reporters.iter_mut().map(|r| &mut **r as &mut dyn Reporter));

        if !*started && !sinks.is_empty() {
            *started = true;
            let mut cx = ReportContext {
                depth: 0,
                verbosity: options.verbosity,
                user_data: &mut *user_data,
            };
            for sink in sinks.iter_mut() {
                if let Err(e) = sink.on_start(random.seed(), &mut cx) {
                    warn!("reporter failed: {e:#}");
                }
            }
        }

        let mut cx = ReportContext {
            depth,
            verbosity: options.verbosity,
            user_data,
        };
        for sink in sinks {
            if let Err(e) = hook(sink, &mut cx) {
                warn!("reporter failed: {e:#}");
            }
        }
    }

    /// Release every sink. Buffered file output is flushed on drop.
    fn close(&mut self) {
        self.file = None;
        self.options.file_log = false;
        self.reporters.clear();
    }

    fn abort(&mut self) -> ! {
        error!("check failed with exit on failure enabled, terminating");
        self.close();
        std::process::exit(1)
    }
}

/// Last component of a source path, for both `/` and `\` separators.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
