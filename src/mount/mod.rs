// Mount orchestration module
//
// - strategy.rs: the escalating mount strategies and their command lines
// - candidates.rs: partition selection when no target is given
// - orchestrator.rs: the Probing/Mounting/Verifying state machine

pub mod candidates;
pub mod orchestrator;
pub mod strategy;


pub use candidates::select_candidates;
pub use orchestrator::MountOrchestrator;
pub use strategy::MountStrategy;

use crate::error::ErrorClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// States of one mount run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MountState {
    Idle,
    Probing,
    Mounting,
    Verifying,
    Succeeded,
    Failed,
}

impl fmt::Display for MountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One strategy tried against one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountAttempt {
    pub partition: String,
    pub strategy: MountStrategy,
    pub elevated: bool,
    pub success: bool,
    /// Filled in after verification of a successful attempt
    pub mount_path: Option<PathBuf>,
    /// Raw tool output
    pub diagnostic: String,
    pub error_class: Option<ErrorClass>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

/// Outcome of a mount run, including every attempt made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountResult {
    pub run_id: Uuid,
    pub success: bool,
    pub path: Option<PathBuf>,
    /// The mount reported success but the path is missing or only guessed
    pub unverified_path: bool,
    pub final_state: MountState,
    pub failure: Option<ErrorClass>,
    pub attempts: Vec<MountAttempt>,
}

impl MountResult {
    pub fn privileged_attempts(&self) -> usize {
        self.attempts.iter().filter(|a| a.elevated).count()
    }
}
