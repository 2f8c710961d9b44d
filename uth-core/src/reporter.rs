//! Report sinks.
//!
//! The runner never prints by itself: every piece of output goes through the
//! [`Reporter`] hooks of the installed sinks. Two text sinks are built in (the
//! terminal and the run log file) and any number of user sinks may be added
//! next to them.
use chrono::Local;
use console::{style, Term};
use eyre::WrapErr;
use std::{
    any::Any,
    fmt,
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::*;

use crate::{Counter, Error, Group, Param, Verbosity};

/// Title of a reported check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title<'a> {
    /// The check as written, e.g. `uth::equals(i, j)` or `a < b`.
    pub description: &'a str,
    /// File name of the call site, without directories.
    pub file: &'a str,
    pub line: u32,
    pub pred: bool,
}

/// Run totals handed to [`Reporter::on_finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub checks: Counter,
    /// One unit per ended group.
    pub groups: Counter,
    pub failed: bool,
}

/// Opaque data the embedder can hand to its reporters.
#[derive(Default)]
pub struct UserData(Option<Box<dyn Any>>);

impl UserData {
    pub fn set<T: Any>(&mut self, data: T) {
        self.0 = Some(Box::new(data));
    }

    /// Returns the data if it was set with type `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref()?.downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.as_deref_mut()?.downcast_mut()
    }

    pub fn take(&mut self) -> Option<Box<dyn Any>> {
        self.0.take()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserData")
            .field("set", &self.is_set())
            .finish()
    }
}

/// State shared with reporters on every hook call.
#[derive(Debug)]
pub struct ReportContext<'a> {
    /// Number of open groups, used for indentation.
    pub depth: usize,
    pub verbosity: Verbosity,
    pub user_data: &'a mut UserData,
}

/// Reporter trait. Every hook is optional; implement the ones you need.
///
/// Hooks are only called when the active [`Verbosity`] asks for the
/// corresponding output, so a reporter does not have to re-check the gating.
pub trait Reporter {
    /// Called once before the first other hook, with the seed of the run's
    /// random values.
    fn on_start(&mut self, _seed: u64, _cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        Ok(())
    }

    /// Called when a group begins. `cx.depth` is the depth of the parent.
    fn on_group_begin(&mut self, _name: &str, _cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        Ok(())
    }

    /// Called when a group ends. `cx.depth` is the depth of the group itself.
    fn on_group_end(&mut self, _group: &Group, _cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        Ok(())
    }

    /// Called first for every reported check.
    fn on_title(&mut self, _title: &Title<'_>, _cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        Ok(())
    }

    /// Called after the title when parameters are reported.
    fn on_params(&mut self, _params: &[Param], _cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        Ok(())
    }

    /// Called last for every reported check.
    fn on_result(&mut self, _pred: bool, _cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        Ok(())
    }

    /// Called once when the run finishes.
    fn on_finish(&mut self, _summary: &Summary, _cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        Ok(())
    }
}

pub struct NullReporter;

impl Reporter for NullReporter {}

type GroupBeginFn = Box<dyn FnMut(&str, &mut UserData)>;
type GroupEndFn = Box<dyn FnMut(&Group, &mut UserData)>;
type TitleFn = Box<dyn FnMut(&Title<'_>, &mut UserData)>;
type ParamsFn = Box<dyn FnMut(&[Param], &mut UserData)>;
type ResultFn = Box<dyn FnMut(bool, &mut UserData)>;

/// Reporter made of independent, optional closures.
///
/// ```
/// use uth_core::Callbacks;
///
/// let callbacks = Callbacks::new()
///     .with_group_begin(|name, _| println!("Group of test[{name}] started"))
///     .with_result(|pred, _| println!("Result: {}", if pred { "Success" } else { "Failure" }));
/// ```
#[derive(Default)]
pub struct Callbacks {
    group_begin: Option<GroupBeginFn>,
    group_end: Option<GroupEndFn>,
    title: Option<TitleFn>,
    params: Option<ParamsFn>,
    result: Option<ResultFn>,
}

impl Callbacks {
    pub fn new() -> Callbacks {
        Callbacks::default()
    }

    pub fn with_group_begin(mut self, f: impl FnMut(&str, &mut UserData) + 'static) -> Self {
        self.group_begin = Some(Box::new(f));
        self
    }

    pub fn with_group_end(mut self, f: impl FnMut(&Group, &mut UserData) + 'static) -> Self {
        self.group_end = Some(Box::new(f));
        self
    }

    pub fn with_title(mut self, f: impl FnMut(&Title<'_>, &mut UserData) + 'static) -> Self {
        self.title = Some(Box::new(f));
        self
    }

    pub fn with_params(mut self, f: impl FnMut(&[Param], &mut UserData) + 'static) -> Self {
        self.params = Some(Box::new(f));
        self
    }

    pub fn with_result(mut self, f: impl FnMut(bool, &mut UserData) + 'static) -> Self {
        self.result = Some(Box::new(f));
        self
    }
}

impl Reporter for Callbacks {
    fn on_group_begin(&mut self, name: &str, cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        if let Some(f) = self.group_begin.as_mut() {
            f(name, cx.user_data);
        }
        Ok(())
    }

    fn on_group_end(&mut self, group: &Group, cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        if let Some(f) = self.group_end.as_mut() {
            f(group, cx.user_data);
        }
        Ok(())
    }

    fn on_title(&mut self, title: &Title<'_>, cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        if let Some(f) = self.title.as_mut() {
            f(title, cx.user_data);
        }
        Ok(())
    }

    fn on_params(&mut self, params: &[Param], cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        if let Some(f) = self.params.as_mut() {
            f(params, cx.user_data);
        }
        Ok(())
    }

    fn on_result(&mut self, pred: bool, cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        if let Some(f) = self.result.as_mut() {
            f(pred, cx.user_data);
        }
        Ok(())
    }
}

/// Line-oriented output of a [`TextReporter`].
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> eyre::Result<()>;

    fn flush(&mut self) -> eyre::Result<()> {
        Ok(())
    }
}

impl LineSink for Term {
    fn write_line(&mut self, line: &str) -> eyre::Result<()> {
        Term::write_line(self, line).wrap_err("failed to write line on terminal")
    }
}

/// The run log file. Lines are written without ANSI styling.
pub struct LogFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogFile {
    /// Create `dir` if needed and open a new, timestamped log file in it for appending.
    pub fn open(dir: impl AsRef<Path>) -> crate::Result<LogFile> {
        let dir = dir.as_ref();
        let path = dir.join(log_file_name(Local::now()));

        std::fs::create_dir_all(dir).map_err(|source| Error::LogFile {
            path: path.clone(),
            source,
        })?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::LogFile {
                path: path.clone(),
                source,
            })?;

        debug!("log file opened: {path:?}");
        Ok(LogFile {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSink for LogFile {
    fn write_line(&mut self, line: &str) -> eyre::Result<()> {
        writeln!(self.writer, "{}", console::strip_ansi_codes(line))
            .wrap_err_with(|| format!("failed to write to {:?}", self.path))
    }

    fn flush(&mut self) -> eyre::Result<()> {
        self.writer
            .flush()
            .wrap_err_with(|| format!("failed to flush {:?}", self.path))
    }
}

/// `log_UTH-<month>.<day>.<year>-<hour>h<minute>m<second>s.txt`
fn log_file_name<Tz: chrono::TimeZone>(time: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("log_UTH-{}.txt", time.format("%-m.%-d.%Y-%-Hh%-Mm%-Ss"))
}

/// Built-in human readable output, one line at a time.
pub struct TextReporter<W> {
    out: W,
}

/// Colored output on stdout.
pub type ConsoleReporter = TextReporter<Term>;

/// Plain output appended to the run log file.
pub type FileReporter = TextReporter<LogFile>;

impl<W: LineSink> TextReporter<W> {
    pub fn new(out: W) -> TextReporter<W> {
        TextReporter { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl ConsoleReporter {
    pub fn stdout() -> ConsoleReporter {
        TextReporter::new(Term::stdout())
    }
}

impl FileReporter {
    pub fn open(dir: impl AsRef<Path>) -> crate::Result<FileReporter> {
        Ok(TextReporter::new(LogFile::open(dir)?))
    }
}

impl<W: LineSink> Reporter for TextReporter<W> {
    fn on_start(&mut self, seed: u64, _cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        self.out
            .write_line(&style(format!("[UTH] Init Rand seed: {seed}")).magenta().to_string())
    }

    fn on_group_begin(&mut self, name: &str, cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        let header = style(format!("[UTH] Group:\t{name}")).blue().bold();
        self.out
            .write_line(&format!("{}{header}", indent(cx.depth)))
    }

    fn on_group_end(&mut self, group: &Group, cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        self.out.write_line(&format!(
            "{}{}{} {}{} {}",
            indent(cx.depth),
            style(format!("[UTH] Group:\t{}", group.name)).blue().bold(),
            style(" run:").blue().bold(),
            styled_count(&group.count),
            style(" and exit with code:").blue().bold(),
            exit_code(group.local_failed)
        ))
    }

    fn on_title(&mut self, title: &Title<'_>, cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        let status = if title.pred {
            style("Success").green()
        } else {
            style("Failure").red()
        };
        let location = style(format!(
            "{} -- {}:{}",
            title.description, title.file, title.line
        ))
        .yellow();
        self.out.write_line(&format!(
            "{}{} {status} {location}",
            indent(cx.depth),
            style("[UTH]").yellow()
        ))
    }

    fn on_params(&mut self, params: &[Param], cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        let indent = indent(cx.depth);
        for param in params {
            if cx.verbosity.contains(Verbosity::PARAM_NAMES) {
                self.out.write_line(&format!("{indent}{}:", param.name))?;
            }
            if param.has_value() {
                let value = param.value.replace('\n', &format!("\n{indent}"));
                self.out.write_line(&format!("{indent}{value}"))?;
            } else {
                let hint = style("Implement ToParamString, Display or Debug for this type.")
                    .yellow()
                    .bold();
                self.out
                    .write_line(&format!("{indent}-No debug string-\t{hint}"))?;
            }
        }
        Ok(())
    }

    fn on_finish(&mut self, summary: &Summary, cx: &mut ReportContext<'_>) -> eyre::Result<()> {
        let mut line = format!(
            "{} {}",
            style("[UTH] Run:").magenta(),
            styled_count(&summary.checks)
        );
        if cx.verbosity.contains(Verbosity::GROUP_COUNTS) && !summary.groups.is_empty() {
            line += &format!(
                "{} {}{}",
                style(" in").magenta(),
                styled_count(&summary.groups),
                style(" groups").blue().bold()
            );
        }
        line += &format!(
            "{} {}",
            style(" and exit with code:").magenta(),
            exit_code(summary.failed)
        );
        self.out.write_line(&line)?;
        self.out.flush()
    }
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

fn styled_count(count: &Counter) -> String {
    let total = style(count.total()).yellow().bold();
    if count.failure == 0 {
        return total.to_string();
    }
    format!(
        "{total} {}{}{}{}{}",
        style("(").yellow().bold(),
        style(count.success).green(),
        style("/").yellow().bold(),
        style(count.failure).red(),
        style(")").yellow().bold()
    )
}

fn exit_code(failed: bool) -> String {
    if failed {
        style("EXIT_FAILURE (1)").red().to_string()
    } else {
        style("EXIT_SUCCESS (0)").green().to_string()
    }
}
