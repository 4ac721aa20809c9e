//! Execution of external utilities.
//!
//! The engine never spawns processes directly. Everything goes through a
//! [`CommandPort`], which keeps the parsers and the mount state machine
//! deterministic under test.

pub mod elevation;

use crate::config::ElevationMethod;
use std::process::Command;

/// Result of one external invocation, stdout and stderr merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: String,
    pub success: bool,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: false,
        }
    }

    /// True when the command produced nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.output.trim().is_empty()
    }

    /// Output text of a successful, non-empty invocation.
    pub fn text(&self) -> Option<&str> {
        if self.success && !self.is_blank() {
            Some(&self.output)
        } else {
            None
        }
    }
}

/// Runs a named utility, optionally under administrator elevation.
///
/// Implementations must not panic: a process that cannot be spawned is
/// reported as a failed [`CommandOutput`] carrying the spawn error text.
#[cfg_attr(test, mockall::automock)]
pub trait CommandPort {
    fn run(&self, args: &[String], elevated: bool) -> CommandOutput;
}

/// Builds an owned argument vector from string slices.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// [`CommandPort`] backed by real processes.
#[derive(Debug, Clone)]
pub struct SystemCommandPort {
    elevation: ElevationMethod,
}

impl SystemCommandPort {
    pub fn new(elevation: ElevationMethod) -> Self {
        Self { elevation }
    }

    pub fn elevation(&self) -> ElevationMethod {
        self.elevation
    }
}

impl Default for SystemCommandPort {
    fn default() -> Self {
        Self::new(ElevationMethod::default())
    }
}

impl CommandPort for SystemCommandPort {
    fn run(&self, args: &[String], elevated: bool) -> CommandOutput {
        let argv = if elevated {
            match elevation::wrap(self.elevation, args) {
                Some(wrapped) => wrapped,
                None => {
                    return CommandOutput::failure(
                        "elevation not authorized: no elevation front-end configured",
                    )
                }
            }
        } else {
            args.to_vec()
        };

        let Some((program, rest)) = argv.split_first() else {
            return CommandOutput::failure("empty command line");
        };

        tracing::debug!(program = %program, args = ?rest, elevated, "Running external command");

        match Command::new(program).args(rest).output() {
            Ok(output) => {
                let mut merged = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    if !merged.is_empty() && !merged.ends_with('\n') {
                        merged.push('\n');
                    }
                    merged.push_str(&stderr);
                }

                if !output.status.success() {
                    tracing::debug!(
                        program = %program,
                        status = ?output.status.code(),
                        "External command exited unsuccessfully"
                    );
                }

                CommandOutput {
                    output: merged,
                    success: output.status.success(),
                }
            }
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "Failed to spawn external command");
                CommandOutput::failure(format!("failed to run {}: {}", program, e))
            }
        }
    }
}
