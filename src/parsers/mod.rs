//! Parsers for the output of the disk and volume utilities.
//!
//! Every parser here is pure and total. Unexpected input yields an empty or
//! partial result; only the structured parser can report a [`ParseError`],
//! and callers recover from it locally.

pub mod mount_table;
pub mod properties;
pub mod structured;
pub mod text;
pub mod usb_inventory;


pub use mount_table::{parse_mount_table, parse_root_device, MountEntry};
pub use properties::{parse_properties, PropertyMap};
pub use structured::parse_disk_plist;
pub use text::parse_disk_list;
pub use usb_inventory::scan_usb_inventory;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Whole-disk record as reported by one discovery tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDisk {
    pub identifier: String,
    /// Lower-cased header qualifiers, e.g. `external`, `physical`
    pub qualifiers: Vec<String>,
    pub content: Option<String>,
    pub name: Option<String>,
    pub size_label: Option<String>,
    pub mount_point: Option<String>,
    /// Partitions backing a synthesized container, e.g. `disk0s2`
    pub physical_stores: Vec<String>,
    pub partitions: Vec<RawPartition>,
}

impl RawDisk {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }
}

/// Partition or volume record nested under a [`RawDisk`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPartition {
    pub identifier: String,
    /// Row index from a textual listing, when there was one
    pub index: Option<u32>,
    pub content_type: String,
    pub name: String,
    pub size_label: Option<String>,
    pub mount_point: Option<String>,
}

impl RawPartition {
    /// Slot number taken from the identifier suffix, else the listing row.
    pub fn slot(&self) -> Option<u32> {
        parse_device_id(&self.identifier)
            .and_then(|id| id.slot)
            .or(self.index)
    }
}

/// Components of a BSD device identifier such as `disk2s1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId {
    /// Whole-disk identifier, `disk2`
    pub disk: String,
    pub index: u32,
    pub slot: Option<u32>,
}

lazy_static! {
    static ref DEVICE_ID: Regex =
        Regex::new(r"^(?:/dev/)?r?(disk(\d+))(?:s(\d+))?").expect("device id pattern is valid");
    static ref DEVICE_NAME: Regex =
        Regex::new(r"^(?:/dev/)?r?(disk\d+(?:s\d+)*)$").expect("device name pattern is valid");
}

/// Splits a device identifier or node path into disk and slot parts.
///
/// Accepts `disk2`, `disk2s1`, `/dev/disk2s1` and raw `/dev/rdisk2`.
/// Nested APFS snapshot identifiers (`disk3s1s1`) resolve to their first slot.
pub fn parse_device_id(text: &str) -> Option<DeviceId> {
    let caps = DEVICE_ID.captures(text.trim())?;
    let disk = caps.get(1)?.as_str().to_string();
    let index = caps.get(2)?.as_str().parse().ok()?;
    let slot = caps.get(3).and_then(|m| m.as_str().parse().ok());
    Some(DeviceId { disk, index, slot })
}

/// Bare identifier for a device token, `disk4s1` from `/dev/disk4s1` or
/// `/dev/rdisk4s1`. Nested slots are kept.
pub fn canonical_device_name(text: &str) -> Option<String> {
    let caps = DEVICE_NAME.captures(text.trim())?;
    Some(caps.get(1)?.as_str().to_string())
}

/// Human-readable size in the decimal units the disk tools print.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes < 1000 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
