//! Degraded scan of `system_profiler SPUSBDataType`.
//!
//! This is a grep-style pass over `BSD Name:` lines, not a real parse of the
//! indented tree. It can over-report and is only used when nothing better
//! produced a drive.

use super::{canonical_device_name, parse_device_id, RawDisk, RawPartition};

/// Disks and volumes mentioned in a USB inventory listing.
pub fn scan_usb_inventory(output: &str) -> Vec<RawDisk> {
    let mut disks: Vec<RawDisk> = Vec::new();
    let mut block_name: Option<String> = None;
    let mut pending_size: Option<String> = None;
    let mut pending_removable = false;
    // (disk index, partition index) of the device the following lines describe
    let mut last: Option<(usize, Option<usize>)> = None;

    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if value.is_empty() {
            block_name = Some(key.to_string());
            continue;
        }

        match key {
            "Capacity" | "Size" => {
                pending_size = Some(value.split(" (").next().unwrap_or(value).trim().to_string());
            }
            "Removable Media" => {
                pending_removable = value.eq_ignore_ascii_case("yes");
            }
            "BSD Name" => {
                let Some((name, id)) = canonical_device_name(value)
                    .and_then(|name| parse_device_id(&name).map(|id| (name, id)))
                else {
                    last = None;
                    continue;
                };

                let disk_pos = match disks.iter().position(|d| d.identifier == id.disk) {
                    Some(pos) => pos,
                    None => {
                        let mut disk = RawDisk::new(id.disk.clone());
                        disk.qualifiers.push("usb".to_string());
                        disks.push(disk);
                        disks.len() - 1
                    }
                };

                if id.slot.is_none() {
                    let disk = &mut disks[disk_pos];
                    if std::mem::take(&mut pending_removable) {
                        disk.qualifiers.push("removable".to_string());
                    }
                    if disk.name.is_none() {
                        disk.name = block_name.clone();
                    }
                    disk.size_label = pending_size.take().or(disk.size_label.take());
                    last = Some((disk_pos, None));
                } else {
                    let disk = &mut disks[disk_pos];
                    disk.partitions.push(RawPartition {
                        identifier: name,
                        index: id.slot,
                        content_type: String::new(),
                        name: block_name.clone().unwrap_or_default(),
                        size_label: pending_size.take(),
                        mount_point: None,
                    });
                    last = Some((disk_pos, Some(disk.partitions.len() - 1)));
                }
            }
            "File System" | "Content" | "Mount Point" => {
                let Some((disk_pos, part_pos)) = last else {
                    continue;
                };
                let disk = &mut disks[disk_pos];
                match (key, part_pos) {
                    ("Mount Point", Some(p)) => disk.partitions[p].mount_point = Some(value.to_string()),
                    ("Mount Point", None) => disk.mount_point = Some(value.to_string()),
                    ("Content", Some(p)) => disk.partitions[p].content_type = value.to_string(),
                    ("File System", Some(p)) => {
                        if disk.partitions[p].content_type.is_empty() {
                            disk.partitions[p].content_type = value.to_string();
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    disks
}
