//! Structured parser for `diskutil list -plist`.
//!
//! The payload may be an XML or binary property list, or a JSON rendition of
//! the same tree. Entries missing the keys we need are skipped individually;
//! only an undecodable payload or a missing top-level list is an error.

use super::{canonical_device_name, format_size, parse_device_id, ParseError, RawDisk, RawPartition};
use serde_json::Value;
use std::io::Cursor;

const DISKS_KEY: &str = "AllDisksAndPartitions";

/// Decodes the payload and walks `AllDisksAndPartitions`.
pub fn parse_disk_plist(payload: &[u8]) -> Result<Vec<RawDisk>, ParseError> {
    let root = decode(payload)?;

    let entries = root
        .get(DISKS_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::new(format!("missing {} list", DISKS_KEY)))?;

    let mut disks = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_disk_entry(entry) {
            Some(disk) => disks.push(disk),
            None => tracing::debug!("Skipping disk entry without DeviceIdentifier"),
        }
    }
    Ok(disks)
}

fn decode(payload: &[u8]) -> Result<Value, ParseError> {
    let trimmed = payload
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|start| &payload[start..])
        .unwrap_or(&[]);

    if trimmed.is_empty() {
        return Err(ParseError::new("empty payload"));
    }

    if trimmed.starts_with(b"{") {
        return serde_json::from_slice(trimmed)
            .map_err(|e| ParseError::new(format!("invalid JSON: {}", e)));
    }

    let value = plist::Value::from_reader(Cursor::new(trimmed))
        .map_err(|e| ParseError::new(format!("invalid property list: {}", e)))?;
    serde_json::to_value(&value)
        .map_err(|e| ParseError::new(format!("unrepresentable property list: {}", e)))
}

fn parse_disk_entry(entry: &Value) -> Option<RawDisk> {
    let identifier = device_field(entry)?;
    let mut disk = RawDisk::new(identifier);

    disk.content = string_field(entry, "Content");
    disk.name = string_field(entry, "VolumeName");
    disk.mount_point = string_field(entry, "MountPoint");
    disk.size_label = entry.get("Size").and_then(Value::as_u64).map(format_size);

    if let Some(stores) = entry.get("APFSPhysicalStores").and_then(Value::as_array) {
        disk.physical_stores = stores
            .iter()
            .filter_map(device_field)
            .collect();
    }

    for (key, default_content) in [("Partitions", None), ("APFSVolumes", Some("APFS"))] {
        let Some(list) = entry.get(key).and_then(Value::as_array) else {
            continue;
        };
        for item in list {
            match parse_partition_entry(item, default_content) {
                Some(partition) => disk.partitions.push(partition),
                None => tracing::debug!(
                    disk = %disk.identifier,
                    list = key,
                    "Skipping partition entry without DeviceIdentifier"
                ),
            }
        }
    }

    Some(disk)
}

fn parse_partition_entry(item: &Value, default_content: Option<&str>) -> Option<RawPartition> {
    let identifier = device_field(item)?;
    let content_type = string_field(item, "Content")
        .or_else(|| default_content.map(str::to_string))
        .unwrap_or_default();

    Some(RawPartition {
        index: parse_device_id(&identifier).and_then(|id| id.slot),
        identifier,
        content_type,
        name: string_field(item, "VolumeName").unwrap_or_default(),
        size_label: item.get("Size").and_then(Value::as_u64).map(format_size),
        mount_point: string_field(item, "MountPoint"),
    })
}

/// `DeviceIdentifier` with any `/dev/` prefix removed.
fn device_field(value: &Value) -> Option<String> {
    let raw = string_field(value, "DeviceIdentifier")?;
    Some(canonical_device_name(&raw).unwrap_or(raw))
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
