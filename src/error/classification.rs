/// Error classification for the mount state machine
///
/// Each failure is put in one of five classes. The class decides whether the
/// run recovers locally, moves on to the next strategy, stops escalating, or
/// ends.
use crate::command::CommandOutput;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of failures by how the engine recovers from them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Tool output could not be parsed - recovered locally with an empty result
    Parse,

    /// No removability signal - conservative default applies
    ProbeInconclusive,

    /// Administrator authorization refused - halts privileged strategies for the run
    ElevationRefused,

    /// One strategy failed - recovered by the next strategy or candidate
    MountStrategyFailed,

    /// Nothing left to try - terminal
    NoCandidateFound,
}

impl ErrorClass {
    pub fn description(&self) -> &'static str {
        match self {
            ErrorClass::Parse => "Tool output unusable, continuing with partial data",
            ErrorClass::ProbeInconclusive => "Classification inconclusive, using safe default",
            ErrorClass::ElevationRefused => "Administrator authorization refused",
            ErrorClass::MountStrategyFailed => "Mount strategy failed, escalating",
            ErrorClass::NoCandidateFound => "No candidate could be mounted",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::Parse => write!(f, "Parse"),
            ErrorClass::ProbeInconclusive => write!(f, "ProbeInconclusive"),
            ErrorClass::ElevationRefused => write!(f, "ElevationRefused"),
            ErrorClass::MountStrategyFailed => write!(f, "MountStrategyFailed"),
            ErrorClass::NoCandidateFound => write!(f, "NoCandidateFound"),
        }
    }
}

/// Phrases the elevation front-ends print when authorization is refused.
pub const REFUSAL_MARKERS: [&str; 6] = [
    "user canceled",
    "(-128)",
    "not authorized",
    "a password is required",
    "request dismissed",
    "incorrect password",
];

/// Error classifier
pub struct ErrorClassifier {
    refusal_markers: Vec<String>,
}

impl ErrorClassifier {
    pub fn new() -> Self {
        Self {
            refusal_markers: REFUSAL_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Classifies one mount attempt's output. `None` means it succeeded.
    ///
    /// A failed elevated invocation is a refusal when it printed nothing or
    /// printed one of the refusal markers.
    pub fn classify_attempt(&self, output: &CommandOutput, elevated: bool) -> Option<ErrorClass> {
        if output.success {
            return None;
        }
        if elevated && self.is_refusal(output) {
            Some(ErrorClass::ElevationRefused)
        } else {
            Some(ErrorClass::MountStrategyFailed)
        }
    }

    pub fn is_refusal(&self, output: &CommandOutput) -> bool {
        if output.is_blank() {
            return true;
        }
        let lower = output.output.to_lowercase();
        self.refusal_markers.iter().any(|m| lower.contains(m.as_str()))
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
