//! Stateless facade over the discovery and mount components.

use crate::command::{argv, CommandPort, SystemCommandPort};
use crate::config::EngineConfig;
use crate::drives::{DeviceEnumerator, SipStatus};
use crate::locator::EfiLocator;
use crate::mount::{MountOrchestrator, MountResult};
use crate::{Drive, EngineResult};
use std::path::{Path, PathBuf};

/// Entry point for callers. Holds no state between operations; every call
/// re-reads the system through its [`CommandPort`].
pub struct Engine<P: CommandPort> {
    port: P,
    config: EngineConfig,
}

impl Engine<SystemCommandPort> {
    /// Engine running real processes with the configured elevation front-end.
    pub fn system(config: EngineConfig) -> Self {
        let port = SystemCommandPort::new(config.elevation);
        Self::new(port, config)
    }
}

impl<P: CommandPort> Engine<P> {
    pub fn new(port: P, config: EngineConfig) -> Self {
        Self { port, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Fresh snapshot of attached drives.
    pub fn enumerate(&self) -> EngineResult<Vec<Drive>> {
        DeviceEnumerator::new(&self.port, &self.config).enumerate()
    }

    /// Mounts `target`, or locates and mounts the most plausible EFI partition.
    pub fn mount_efi(&self, target: Option<&str>) -> MountResult {
        MountOrchestrator::new(&self.port, &self.config).mount_efi(target)
    }

    pub fn locate_current_efi(&self) -> Option<PathBuf> {
        EfiLocator::new(&self.port, &self.config).locate()
    }

    /// Unmounts the volume at `path`, returning success and the tool's output.
    pub fn unmount(&self, path: &Path) -> (bool, String) {
        let path = path.to_string_lossy().into_owned();
        let out = self
            .port
            .run(&argv(&[self.config.tools.diskutil.as_str(), "unmount", path.as_str()]), false);

        if out.success {
            tracing::info!(path = %path, "Unmounted volume");
        } else {
            tracing::warn!(path = %path, output = %out.output.trim(), "Unmount failed");
        }
        (out.success, out.output)
    }

    pub fn sip_status(&self) -> SipStatus {
        SipStatus::query(&self.port, &self.config)
    }
}
