//! Pure classification of disks and partitions.
//!
//! Side probes (`diskutil info`, `df /`) are executed by the caller and passed
//! in as text, so nothing here touches the system.

use crate::parsers::{parse_device_id, parse_properties, parse_root_device, RawDisk, RawPartition};
use crate::{DriveKind, EngineError, EngineResult};
use std::collections::HashSet;

/// Tokens indicating removable media. Any of them makes a disk External.
pub const EXTERNAL_SIGNALS: [&str; 3] = ["external", "usb", "removable"];

/// Tokens indicating a fixed, built-in disk.
pub const INTERNAL_SIGNALS: [&str; 3] = ["internal", "fixed", "pci"];

/// GPT partition type of an EFI System Partition.
pub const ESP_TYPE_GUID: &str = "C12A7328-F81F-11D2-BA4B-00A0C93EC93B";

/// Decides removability, falling back to Internal when nothing is conclusive.
pub fn classify_removable(record: &RawDisk, probe_text: &str) -> DriveKind {
    match assess_removable(record, probe_text) {
        Ok(kind) => kind,
        Err(e) => {
            tracing::debug!(disk = %record.identifier, reason = %e, "Defaulting to Internal");
            DriveKind::Internal
        }
    }
}

/// Removability verdict, or `ProbeInconclusive` when no signal is present.
///
/// External wins when both kinds of signal appear.
pub fn assess_removable(record: &RawDisk, probe_text: &str) -> EngineResult<DriveKind> {
    let record_text = record.qualifiers.join(" ").to_lowercase();
    let probe_text = probe_signal_text(probe_text);

    let has = |signals: &[&str]| {
        signals
            .iter()
            .any(|s| record_text.contains(s) || probe_text.contains(s))
    };

    if has(&EXTERNAL_SIGNALS) {
        Ok(DriveKind::External)
    } else if has(&INTERNAL_SIGNALS) {
        Ok(DriveKind::Internal)
    } else {
        Err(EngineError::ProbeInconclusive(format!(
            "no removability signal for {}",
            record.identifier
        )))
    }
}

/// Lower-cased text to search for signals.
///
/// For `Key: Value` listings only the values count: the key
/// `Removable Media` carries no meaning when its value is `Fixed`.
fn probe_signal_text(probe_text: &str) -> String {
    let props = parse_properties(probe_text);
    if props.is_empty() {
        probe_text.to_lowercase()
    } else {
        props.values().collect::<Vec<_>>().join("\n").to_lowercase()
    }
}

/// Whether a partition looks like an EFI system partition.
///
/// Slot 1 with a FAT filesystem is accepted as a weaker fallback match.
pub fn classify_efi(partition: &RawPartition) -> bool {
    let content = partition.content_type.to_uppercase();
    let name = partition.name.to_uppercase();

    content.contains("EFI")
        || content.contains(ESP_TYPE_GUID)
        || name.contains("EFI")
        || (partition.slot() == Some(1) && is_fat_family(&partition.content_type))
}

/// FAT12/16/32 content descriptors across the tools' spellings. exFAT is excluded.
pub fn is_fat_family(content_type: &str) -> bool {
    let lower = content_type.to_lowercase();
    if lower.contains("exfat") {
        return false;
    }
    lower.contains("fat") || lower.contains("msdos") || lower.contains("ms-dos")
}

/// Whether `disk_identifier` is the parent of the volume mounted at `/`.
pub fn classify_boot_device(disk_identifier: &str, root_probe_text: &str) -> bool {
    root_disk(root_probe_text).is_some_and(|disk| disk == disk_identifier)
}

fn root_disk(root_probe_text: &str) -> Option<String> {
    let device = parse_root_device(root_probe_text)?;
    parse_device_id(&device).map(|id| id.disk)
}

/// Boot disks among `records`: the root volume's parent plus the physical
/// disks backing it when the parent is a synthesized container.
pub fn resolve_boot_disks(records: &[RawDisk], root_probe_text: &str) -> HashSet<String> {
    let mut boot = HashSet::new();
    let Some(root) = root_disk(root_probe_text) else {
        return boot;
    };

    for record in records.iter().filter(|r| r.identifier == root) {
        for store in &record.physical_stores {
            if let Some(id) = parse_device_id(store) {
                boot.insert(id.disk);
            }
        }
    }
    boot.insert(root);
    boot
}
