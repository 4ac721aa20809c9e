//! System Integrity Protection status, which decides whether unprivileged
//! mounts of the EFI partition can work at all.

use crate::command::{argv, CommandPort};
use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SipStatus {
    Enabled,
    Disabled,
    /// Some protections turned off individually
    Custom,
    Unknown,
}

impl SipStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SipStatus::Enabled => "enabled",
            SipStatus::Disabled => "disabled",
            SipStatus::Custom => "custom configuration",
            SipStatus::Unknown => "unknown",
        }
    }

    /// Queries `csrutil status`. Any failure reads as `Unknown`.
    pub fn query<P: CommandPort + ?Sized>(port: &P, config: &EngineConfig) -> SipStatus {
        let out = port.run(&argv(&[config.tools.csrutil.as_str(), "status"]), false);
        match out.text() {
            Some(text) => parse_sip_status(text),
            None => {
                tracing::debug!(output = %out.output.trim(), "csrutil status unavailable");
                SipStatus::Unknown
            }
        }
    }
}

impl std::fmt::Display for SipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn parse_sip_status(output: &str) -> SipStatus {
    let lower = output.to_lowercase();
    let Some(line) = lower.lines().find(|l| l.contains("system integrity protection status")) else {
        return SipStatus::Unknown;
    };

    if lower.contains("custom configuration") {
        SipStatus::Custom
    } else if line.contains("disabled") {
        SipStatus::Disabled
    } else if line.contains("enabled") {
        SipStatus::Enabled
    } else {
        SipStatus::Unknown
    }
}
