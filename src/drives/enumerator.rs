use super::classifier::{classify_efi, classify_removable, resolve_boot_disks};
use crate::command::{argv, CommandPort};
use crate::config::EngineConfig;
use crate::parsers::{
    parse_device_id, parse_disk_list, parse_disk_plist, parse_properties, scan_usb_inventory,
    RawDisk,
};
use crate::{Drive, DriveKind, EngineResult, Partition, UNKNOWN_LABEL};
use std::collections::HashSet;
use std::path::PathBuf;

/// Discovery strategies, most reliable first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationStrategy {
    /// `diskutil list -plist`
    Structured,

    /// `diskutil list` plus one `diskutil info` per disk
    LineOriented,

    /// USB inventory scan; approximate and may over-report
    DegradedScan,
}

impl EnumerationStrategy {
    pub const ORDER: [EnumerationStrategy; 3] = [
        EnumerationStrategy::Structured,
        EnumerationStrategy::LineOriented,
        EnumerationStrategy::DegradedScan,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            EnumerationStrategy::Structured => "structured property-list listing",
            EnumerationStrategy::LineOriented => "plain-text listing with per-disk probes",
            EnumerationStrategy::DegradedScan => "USB inventory text scan",
        }
    }

    fn probes_each_disk(&self) -> bool {
        !matches!(self, EnumerationStrategy::DegradedScan)
    }
}

/// Produces a fresh [`Drive`] snapshot on every call.
pub struct DeviceEnumerator<'a, P: CommandPort + ?Sized> {
    port: &'a P,
    config: &'a EngineConfig,
}

impl<'a, P: CommandPort + ?Sized> DeviceEnumerator<'a, P> {
    pub fn new(port: &'a P, config: &'a EngineConfig) -> Self {
        Self { port, config }
    }

    /// Runs the strategies in order and returns the first non-empty result,
    /// deduplicated and sorted. No drives at all is `Ok(vec![])`.
    pub fn enumerate(&self) -> EngineResult<Vec<Drive>> {
        let root_probe = self.root_probe();

        for strategy in EnumerationStrategy::ORDER {
            let records = self.discover(strategy);
            if records.is_empty() {
                tracing::debug!(strategy = ?strategy, "Strategy produced no disks");
                continue;
            }

            let drives = self.build_drives(&records, &root_probe, strategy);
            if drives.is_empty() {
                continue;
            }

            tracing::info!(
                strategy = ?strategy,
                description = strategy.description(),
                count = drives.len(),
                "Enumerated drives"
            );
            return Ok(finalize(drives));
        }

        tracing::info!("No drives found by any enumeration strategy");
        Ok(Vec::new())
    }

    fn discover(&self, strategy: EnumerationStrategy) -> Vec<RawDisk> {
        let tools = &self.config.tools;
        match strategy {
            EnumerationStrategy::Structured => {
                let out = self.port.run(&argv(&[tools.diskutil.as_str(), "list", "-plist"]), false);
                let Some(text) = out.text() else {
                    return Vec::new();
                };
                parse_disk_plist(text.as_bytes()).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Structured disk listing unusable");
                    Vec::new()
                })
            }
            EnumerationStrategy::LineOriented => {
                let out = self.port.run(&argv(&[tools.diskutil.as_str(), "list"]), false);
                out.text().map(parse_disk_list).unwrap_or_default()
            }
            EnumerationStrategy::DegradedScan => {
                let out = self
                    .port
                    .run(&argv(&[tools.system_profiler.as_str(), "SPUSBDataType"]), false);
                out.text().map(scan_usb_inventory).unwrap_or_default()
            }
        }
    }

    fn root_probe(&self) -> String {
        let out = self.port.run(&argv(&[self.config.tools.df.as_str(), "/"]), false);
        out.text().unwrap_or_default().to_string()
    }

    fn disk_probe(&self, identifier: &str) -> Option<String> {
        let out = self
            .port
            .run(&argv(&[self.config.tools.diskutil.as_str(), "info", identifier]), false);
        out.text().map(str::to_string)
    }

    fn build_drives(
        &self,
        records: &[RawDisk],
        root_probe: &str,
        strategy: EnumerationStrategy,
    ) -> Vec<Drive> {
        let boot_disks = resolve_boot_disks(records, root_probe);

        records
            .iter()
            .filter(|r| parse_device_id(&r.identifier).is_some_and(|id| id.slot.is_none()))
            .map(|record| {
                let probe = if strategy.probes_each_disk() {
                    self.disk_probe(&record.identifier)
                } else {
                    None
                };
                build_drive(record, probe.as_deref(), boot_disks.contains(&record.identifier))
            })
            .collect()
    }
}

/// Assembles one [`Drive`] from its record and optional `diskutil info` text.
pub(crate) fn build_drive(record: &RawDisk, probe: Option<&str>, is_boot_device: bool) -> Drive {
    let props = probe.map(parse_properties).unwrap_or_default();

    let kind = match probe {
        None if record.qualifiers.is_empty() => DriveKind::Unknown,
        _ => classify_removable(record, probe.unwrap_or_default()),
    };

    let display_name = props
        .media_name()
        .map(str::to_string)
        .or_else(|| record.name.clone())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

    let size_label = record
        .size_label
        .clone()
        .or_else(|| props.size_label())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

    let mount_point = props
        .mount_point()
        .or_else(|| record.mount_point.as_ref().map(PathBuf::from));

    let mut seen = HashSet::new();
    let partitions = record
        .partitions
        .iter()
        .filter(|raw| {
            let owned = parse_device_id(&raw.identifier)
                .is_some_and(|id| id.disk == record.identifier && id.slot.is_some());
            if !owned {
                tracing::warn!(
                    disk = %record.identifier,
                    partition = %raw.identifier,
                    "Dropping partition not owned by its disk"
                );
            }
            owned && seen.insert(raw.identifier.clone())
        })
        .map(|raw| Partition {
            identifier: raw.identifier.clone(),
            display_name: if raw.name.is_empty() {
                UNKNOWN_LABEL.to_string()
            } else {
                raw.name.clone()
            },
            size_label: raw
                .size_label
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            content_type: raw.content_type.clone(),
            mount_point: raw.mount_point.as_ref().map(PathBuf::from),
            is_efi_candidate: classify_efi(raw),
        })
        .collect();

    Drive {
        identifier: record.identifier.clone(),
        display_name,
        size_label,
        kind,
        mount_point,
        is_boot_device,
        partitions,
    }
}

/// Drops repeated identifiers (first wins) and orders External, Internal,
/// Unknown, then by identifier.
pub fn finalize(drives: Vec<Drive>) -> Vec<Drive> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Drive> = drives
        .into_iter()
        .filter(|d| seen.insert(d.identifier.clone()))
        .collect();

    unique.sort_by(|a, b| {
        a.kind
            .sort_rank()
            .cmp(&b.kind.sort_rank())
            .then_with(|| a.identifier.cmp(&b.identifier))
    });
    unique
}
