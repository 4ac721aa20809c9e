/// Mount strategies - escalating ways of getting a partition mounted
///
/// Tried in a fixed order from least to most invasive. Only the first runs
/// without administrator rights.
use crate::command::{argv, elevation::shell_quote};
use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MountStrategy {
    /// `diskutil mount` as the current user
    Unprivileged,

    /// `diskutil mount` with administrator rights
    Privileged,

    /// Direct `mount -t` into a fresh directory, skipping the consistency
    /// check `diskutil` runs first
    PrivilegedForced,

    /// `diskutil mount readOnly` with administrator rights
    PrivilegedReadOnly,
}

impl MountStrategy {
    pub const ESCALATION_ORDER: [MountStrategy; 4] = [
        MountStrategy::Unprivileged,
        MountStrategy::Privileged,
        MountStrategy::PrivilegedForced,
        MountStrategy::PrivilegedReadOnly,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            MountStrategy::Unprivileged => "Unprivileged mount",
            MountStrategy::Privileged => "Privileged mount",
            MountStrategy::PrivilegedForced => "Privileged forced mount (no consistency check)",
            MountStrategy::PrivilegedReadOnly => "Privileged read-only mount",
        }
    }

    pub fn is_elevated(&self) -> bool {
        !matches!(self, MountStrategy::Unprivileged)
    }

    /// Strategies permitted by `config`, in escalation order.
    pub fn enabled(config: &EngineConfig) -> Vec<MountStrategy> {
        Self::ESCALATION_ORDER
            .into_iter()
            .filter(|s| match s {
                MountStrategy::PrivilegedForced => config.allow_forced_mount,
                MountStrategy::PrivilegedReadOnly => config.allow_read_only_mount,
                _ => true,
            })
            .collect()
    }

    /// Command line mounting `partition` with this strategy.
    pub fn command(&self, partition: &str, config: &EngineConfig) -> Vec<String> {
        let diskutil = config.tools.diskutil.as_str();
        match self {
            MountStrategy::Unprivileged | MountStrategy::Privileged => {
                argv(&[diskutil, "mount", partition])
            }
            MountStrategy::PrivilegedForced => {
                let target = forced_mount_dir(partition, config);
                // device and directory travel as $0 and $1, never spliced into the script.
                // A failed mount removes the directory again.
                let script = format!(
                    "mkdir -p \"$1\" && {{ {} -t {} \"/dev/$0\" \"$1\" || {{ rmdir \"$1\"; exit 1; }}; }}",
                    shell_quote(&config.tools.mount),
                    shell_quote(&config.forced_fs_type)
                );
                vec![
                    "sh".to_string(),
                    "-c".to_string(),
                    script,
                    partition.to_string(),
                    target,
                ]
            }
            MountStrategy::PrivilegedReadOnly => argv(&[diskutil, "mount", "readOnly", partition]),
        }
    }
}

impl fmt::Display for MountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Directory the forced strategy mounts into, `<volumes_root>/EFI-<id>`.
pub fn forced_mount_dir(partition: &str, config: &EngineConfig) -> String {
    config
        .volumes_root
        .join(format!("EFI-{}", partition))
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation_order_is_fixed() {
        assert_eq!(
            MountStrategy::ESCALATION_ORDER,
            [
                MountStrategy::Unprivileged,
                MountStrategy::Privileged,
                MountStrategy::PrivilegedForced,
                MountStrategy::PrivilegedReadOnly,
            ]
        );
        assert!(!MountStrategy::Unprivileged.is_elevated());
        assert!(MountStrategy::ESCALATION_ORDER[1..].iter().all(|s| s.is_elevated()));
    }

    #[test]
    fn test_disabled_strategies_are_skipped() {
        let config = EngineConfig {
            allow_forced_mount: false,
            ..EngineConfig::default()
        };
        assert_eq!(
            MountStrategy::enabled(&config),
            vec![
                MountStrategy::Unprivileged,
                MountStrategy::Privileged,
                MountStrategy::PrivilegedReadOnly,
            ]
        );
    }

    #[test]
    fn test_commands() {
        let config = EngineConfig::default();

        assert_eq!(
            MountStrategy::Privileged.command("disk2s1", &config),
            argv(&["diskutil", "mount", "disk2s1"])
        );
        assert_eq!(
            MountStrategy::PrivilegedReadOnly.command("disk2s1", &config),
            argv(&["diskutil", "mount", "readOnly", "disk2s1"])
        );

        let forced = MountStrategy::PrivilegedForced.command("disk2s1", &config);
        assert_eq!(forced[0], "sh");
        assert_eq!(
            forced[2],
            "mkdir -p \"$1\" && { mount -t msdos \"/dev/$0\" \"$1\" || { rmdir \"$1\"; exit 1; }; }"
        );
        assert_eq!(forced[3], "disk2s1");
        assert_eq!(forced[4], "/Volumes/EFI-disk2s1");
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_forced_mount_leaves_no_directory() {
        use crate::command::{CommandPort, SystemCommandPort};
        use crate::config::ElevationMethod;
        use crate::locator::most_recent_volume;

        let dir = tempfile::TempDir::new().unwrap();
        let mut config = EngineConfig::default().with_volumes_root(dir.path());
        config.tools.mount = "false".to_string();

        let port = SystemCommandPort::new(ElevationMethod::None);
        let out = port.run(&MountStrategy::PrivilegedForced.command("disk2s1", &config), false);

        assert!(!out.success);
        assert!(!dir.path().join("EFI-disk2s1").exists());
        assert_eq!(most_recent_volume(dir.path()), None);
    }
}
