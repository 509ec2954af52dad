use std::{
    fmt,
    fs::{self, File},
    io::{self, Write},
};

use env_logger::{Builder, Target, WriteStyle, fmt::Formatter};
use log::Level;

use crate::{
    Error, Result,
    options::{LogFormat, SolverOptions},
};

/// Installs the global logger described by `--log-*` options. Fails if a
/// logger is already set.
pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .target(log_target(options)?)
        .format(move |buf: &mut Formatter, record| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            write_line(
                buf,
                log_format,
                record.level(),
                record.target(),
                record.args(),
            )
        });

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn log_target(options: &SolverOptions) -> Result<Target> {
    let Some(log_path) = options.log_output_path() else {
        return Ok(Target::Stderr);
    };

    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let log_file = File::create(log_path).map_err(|e| {
        Error::other(format!(
            "failed to create log output file {}: {e}",
            log_path.display()
        ))
    })?;
    Ok(Target::Pipe(Box::new(log_file)))
}

fn write_line<W: Write>(
    out: &mut W,
    format: LogFormat,
    level: Level,
    target: &str,
    args: &fmt::Arguments<'_>,
) -> io::Result<()> {
    match format {
        LogFormat::Compact => writeln!(out, "{} {args}", level_tag(level)),
        LogFormat::Pretty => writeln!(out, "{} [{target}] {args}", level_tag(level)),
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
