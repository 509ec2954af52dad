use std::{env, path::Path};

use log::LevelFilter;
use tsp_route_derive::{CliOptions, CliValue, KvDisplay};

use crate::{
    Error, Result,
    algo::dispatch::{Strategy, validate_exact_threshold},
    constants::{DEFAULT_EXACT_THRESHOLD, DEFAULT_SPIKE_FACTOR},
};

/// Runtime options for the solver and its command-line front end.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Largest point count solved exactly when `algorithm` is `auto`.
    #[cli(long = "exact-threshold")]
    pub exact_threshold: usize,
    /// `auto`, `exact`, or `heuristic`.
    #[cli(long = "algorithm", parse_with = "Strategy::parse")]
    pub algorithm: Strategy,
    /// Index the tour starts and ends at.
    #[cli(long = "start")]
    pub start: usize,
    /// How the input is laid out.
    #[cli(long = "input-format", parse_with = "InputFormat::parse")]
    pub input_format: InputFormat,
    /// Edges longer than `average * spike_factor` are counted as spikes in metrics logs.
    #[cli(long = "spike-factor")]
    pub spike_factor: f64,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp", flag)]
    pub log_timestamp: bool,
    /// Optional output file path for logs and metrics. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
    /// Optional input file path. Empty means stdin.
    #[cli(long = "input")]
    pub input: String,
    /// Optional output file path for the route. Empty means stdout.
    #[cli(long = "output")]
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "input-format")]
pub enum InputFormat {
    /// One matrix row per line.
    Matrix,
    /// Whitespace-separated `lat,lng` tokens.
    #[cli(alias = "latlng")]
    Points,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            algorithm: Strategy::Auto,
            start: 0,
            input_format: InputFormat::Matrix,
            spike_factor: DEFAULT_SPIKE_FACTOR,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        let options = Self::parse_from_iter(env::args().skip(1))?;
        options.validate()?;
        Ok(options)
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        validate_exact_threshold(self.exact_threshold)?;
        if !(self.spike_factor.is_finite() && self.spike_factor > 0.0) {
            return Err(Error::invalid_input(format!(
                "spike_factor must be > 0, got {}",
                self.spike_factor
            )));
        }
        Ok(())
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-route [options] [--input matrix.txt]\n",
            "  tsp-route [options] < matrix.txt\n\n",
            "Options:\n",
            "  --input-format <matrix|points>\n",
            "  --start <usize>\n",
            "  --algorithm <auto|exact|heuristic>\n",
            "  --exact-threshold <usize>   (max 20)\n",
            "  --spike-factor <f64>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Input:\n",
            "  matrix: one row per line, costs separated by whitespace or commas\n",
            "  points: whitespace-separated lat,lng tokens (haversine km)\n",
            "\n",
            "Examples:\n",
            "  tsp-route --input distances.txt --start 2\n",
            "  tsp-route --input-format points --log-level info < stops.txt\n",
            "  tsp-route --algorithm heuristic --output route.txt < distances.txt\n",
            "  tsp-route --exact-threshold 12 --log-level=debug --log-format=pretty < distances.txt\n",
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.log_output)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_stdio_path(&self.input)
    }
}

/// Empty or `-` means the standard stream.
fn non_stdio_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

pub(crate) fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}
