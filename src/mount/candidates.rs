//! Choosing which partitions to try when no explicit target was given.

use crate::parsers::parse_device_id;
use crate::Drive;

/// Partition identifiers to try, in order.
///
/// Tier one is every EFI-candidate partition on a non-boot drive, external
/// drives first. Only when that is empty, tier two guesses slot 1 of every
/// non-boot disk by ascending disk number.
pub fn select_candidates(drives: &[Drive], include_boot_disk: bool) -> Vec<String> {
    let mut eligible: Vec<&Drive> = drives
        .iter()
        .filter(|d| include_boot_disk || !d.is_boot_device)
        .collect();
    // stable: enumeration order is kept within a kind
    eligible.sort_by_key(|d| d.kind.sort_rank());

    let mut candidates: Vec<String> = Vec::new();
    for partition in eligible.iter().flat_map(|d| d.efi_candidates()) {
        if !candidates.contains(&partition.identifier) {
            candidates.push(partition.identifier.clone());
        }
    }
    if !candidates.is_empty() {
        return candidates;
    }

    let mut disks: Vec<(u32, &str)> = eligible
        .iter()
        .filter_map(|d| {
            let id = parse_device_id(&d.identifier)?;
            if id.slot.is_some() || id.disk != d.identifier {
                return None;
            }
            Some((id.index, d.identifier.as_str()))
        })
        .collect();
    disks.sort();
    disks.dedup();

    let fallback: Vec<String> = disks.iter().map(|(_, disk)| format!("{}s1", disk)).collect();
    if !fallback.is_empty() {
        tracing::debug!(candidates = ?fallback, "No EFI-flagged partitions, falling back to slot 1");
    }
    fallback
}
