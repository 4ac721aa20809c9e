// Allow acronyms such as EFI and SIP in type names
#![allow(clippy::upper_case_acronyms)]

pub mod command;
pub mod config;
pub mod drives;
pub mod engine;
pub mod error;
pub mod locator;
pub mod mount;
pub mod parsers;

// Re-export the engine facade for convenience
pub use command::{CommandOutput, CommandPort, SystemCommandPort};
pub use config::{ElevationMethod, EngineConfig};
pub use drives::{DeviceEnumerator, SipStatus};
pub use engine::Engine;
pub use locator::EfiLocator;
pub use mount::{MountAttempt, MountOrchestrator, MountResult, MountState, MountStrategy};
pub use parsers::ParseError;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised inside the discovery and mount engine.
///
/// Most of these never escape a public operation: parse failures degrade to
/// empty results and strategy failures become entries in the attempt trail.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tool output could not be parsed: {0}")]
    Parse(#[from] ParseError),

    #[error("Classification inconclusive: {0}")]
    ProbeInconclusive(String),

    #[error("Privilege elevation refused: {0}")]
    ElevationRefused(String),

    #[error("Mount strategy failed: {0}")]
    MountStrategyFailed(String),

    #[error("No mountable candidate found: {0}")]
    NoCandidateFound(String),

    #[error("External command failed: {0}")]
    CommandFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::CommandFailed(err.to_string())
    }
}

impl From<::config::ConfigError> for EngineError {
    fn from(err: ::config::ConfigError) -> Self {
        EngineError::Config(err.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Removability classification of a whole device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveKind {
    Internal,
    External,
    Unknown,
}

impl DriveKind {
    /// Position in listing order; external media surfaces first.
    pub fn sort_rank(&self) -> u8 {
        match self {
            DriveKind::External => 0,
            DriveKind::Internal => 1,
            DriveKind::Unknown => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DriveKind::Internal => "internal",
            DriveKind::External => "external",
            DriveKind::Unknown => "unknown",
        }
    }
}

/// One physical or logical block device from a single enumeration snapshot.
///
/// `identifier` is only meaningful within the snapshot that produced it; the
/// device may be gone by the time a caller acts on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drive {
    pub identifier: String,
    pub display_name: String,
    pub size_label: String,
    pub kind: DriveKind,
    pub mount_point: Option<PathBuf>,
    pub is_boot_device: bool,
    pub partitions: Vec<Partition>,
}

impl Drive {
    pub fn efi_candidates(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter().filter(|p| p.is_efi_candidate)
    }
}

/// One addressable volume inside a [`Drive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub identifier: String,
    pub display_name: String,
    pub size_label: String,
    pub content_type: String,
    pub mount_point: Option<PathBuf>,
    pub is_efi_candidate: bool,
}

/// Placeholder for labels the tools did not report.
pub const UNKNOWN_LABEL: &str = "Unknown";
