//! Writes command results and failures for the CLI.
//!
//! Command handlers return data; this type picks tables or JSON. In JSON
//! mode every envelope, success or error, goes to stdout so a script reads
//! one stream. Text-mode errors go to stderr.

use crate::error::AtlasError;
use crate::io::exit_code::ExitCode;
use crate::io::format::{JsonResponse, OutputFormat, ResponseMeta};
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};
use std::time::Instant;

/// Routes results by `OutputFormat`.
pub struct OutputManager {
    format: OutputFormat,
    started: Instant,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl OutputManager {
    /// Writes to the process stdout and stderr.
    pub fn new(format: OutputFormat) -> Self {
        Self::new_with_writers(format, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Writes to the given sinks. Tests capture output this way.
    pub fn new_with_writers(
        format: OutputFormat,
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            started: Instant::now(),
            stdout,
            stderr,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Prints `data` as a table or as a `JsonResponse` with timing metadata.
    pub fn success<T>(&mut self, data: T) -> io::Result<ExitCode>
    where
        T: Serialize + Display,
    {
        match self.format {
            OutputFormat::Json => {
                let elapsed = self.started.elapsed().as_millis() as u64;
                let response = JsonResponse::success(&data).with_meta(ResponseMeta::now(elapsed));
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stdout, "{data}")?;
            }
        }
        Ok(ExitCode::Success)
    }

    /// Reports `error` and returns the code the process should exit with.
    pub fn error(&mut self, error: &AtlasError) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::from_error(error);
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "Error: {error}")?;
                for suggestion in error.recovery_suggestions() {
                    writeln!(self.stderr, "  Suggestion: {suggestion}")?;
                }
            }
        }
        Ok(ExitCode::from_error(error))
    }

    /// Reports a failure that has no `AtlasError` behind it.
    pub fn general_error(&mut self, message: &str) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::general_error(message);
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "Error: {message}")?;
            }
        }
        Ok(ExitCode::GeneralError)
    }

    /// Status line for humans; dropped in JSON mode.
    pub fn info(&mut self, message: &str) -> io::Result<()> {
        if matches!(self.format, OutputFormat::Text) {
            writeln!(self.stdout, "{message}")?;
        }
        Ok(())
    }
}
