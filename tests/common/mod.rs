/// Common test utilities and mock infrastructure
///
/// - Scripted command registry standing in for the disk utilities
/// - Captured-style tool outputs
/// - Registry presets for whole machines

pub mod fixtures;
pub mod mock_commands;

use efimount::{CommandOutput, EngineConfig};
use mock_commands::MockCommandRegistry;
use std::path::Path;

/// Config pointed at a scratch volumes root
#[allow(dead_code)]
pub fn test_config(volumes_root: &Path) -> EngineConfig {
    EngineConfig::default().with_volumes_root(volumes_root)
}

/// Internal boot `disk0` plus external `disk2`, discovered via the
/// structured listing, nothing mounted yet
#[allow(dead_code)]
pub fn two_disk_machine() -> MockCommandRegistry {
    let registry = MockCommandRegistry::new();
    registry
        .register("df /", CommandOutput::success(fixtures::DF_ROOT_DISK0))
        .register(
            "diskutil list -plist",
            CommandOutput::success(fixtures::DISKUTIL_LIST_PLIST),
        )
        .register("diskutil list", CommandOutput::success(fixtures::DISKUTIL_LIST))
        .register("diskutil info disk0", CommandOutput::success(fixtures::INFO_DISK0))
        .register("diskutil info disk2", CommandOutput::success(fixtures::INFO_DISK2))
        .register("mount", CommandOutput::success(fixtures::mount_table(&[])));
    registry
}
