//! Line-oriented parser for the plain `diskutil list` listing.
//!
//! ```text
//! /dev/disk2 (external, physical):
//!    #:                       TYPE NAME                    SIZE       IDENTIFIER
//!    0:     FDisk_partition_scheme                        *16.0 GB    disk2
//!    1:                 DOS_FAT_32 EFI                     209.7 MB   disk2s1
//! ```

use super::{canonical_device_name, parse_device_id, RawDisk, RawPartition};

const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "KiB", "MiB", "GiB"];

/// Byte offsets taken from the `#: TYPE NAME SIZE IDENTIFIER` header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    name_start: usize,
}

impl Columns {
    fn from_header(line: &str) -> Option<Self> {
        line.find("NAME").map(|name_start| Self { name_start })
    }
}

/// Parses a full `diskutil list` listing into disk records.
pub fn parse_disk_list(output: &str) -> Vec<RawDisk> {
    let mut disks = Vec::new();
    let mut current: Option<RawDisk> = None;
    let mut columns: Option<Columns> = None;

    for line in output.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(disk) = parse_header(line) {
            if let Some(done) = current.take() {
                disks.push(done);
            }
            current = Some(disk);
            columns = None;
            continue;
        }

        let Some(disk) = current.as_mut() else {
            continue;
        };

        let trimmed = line.trim_start();
        if trimmed.starts_with("#:") {
            columns = Columns::from_header(line);
        } else if trimmed.starts_with("Physical Store") {
            disk.physical_stores.extend(
                trimmed
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|t| parse_device_id(t).is_some_and(|id| id.slot.is_some()))
                    .filter_map(canonical_device_name),
            );
        } else if let Some(row) = parse_partition_line(line, columns) {
            if row.identifier == disk.identifier {
                // Row 0 describes the whole disk and its scheme
                disk.content = non_empty(row.content_type);
                if disk.name.is_none() {
                    disk.name = non_empty(row.name);
                }
                disk.size_label = row.size_label;
            } else if parse_device_id(&row.identifier).is_some_and(|id| id.disk == disk.identifier)
            {
                disk.partitions.push(row);
            } else {
                tracing::trace!(
                    disk = %disk.identifier,
                    row = %row.identifier,
                    "Ignoring row that belongs to another disk"
                );
            }
        }
    }

    if let Some(done) = current.take() {
        disks.push(done);
    }

    disks
}

/// Recognizes `/dev/disk2 (external, physical):` style section headers.
fn parse_header(line: &str) -> Option<RawDisk> {
    if line.starts_with(char::is_whitespace) || !line.contains(':') {
        return None;
    }

    let token = line
        .split(|c: char| c.is_whitespace() || c == ':')
        .next()?;
    if !token.starts_with("/dev/") && !token.starts_with("disk") {
        return None;
    }

    let id = parse_device_id(token)?;
    if id.slot.is_some() {
        return None;
    }

    let mut disk = RawDisk::new(id.disk);
    if let (Some(open), Some(close)) = (line.find('('), line.rfind(')')) {
        if open < close {
            disk.qualifiers = line[open + 1..close]
                .split(',')
                .map(|q| q.trim().to_lowercase())
                .filter(|q| !q.is_empty())
                .collect();
        }
    }
    Some(disk)
}

/// Parses one `   1:   TYPE NAME   SIZE   IDENTIFIER` row.
fn parse_partition_line(line: &str, columns: Option<Columns>) -> Option<RawPartition> {
    if !line.starts_with(char::is_whitespace) {
        return None;
    }

    let lead = line.len() - line.trim_start().len();
    let colon = lead + line[lead..].find(':')?;
    let index: u32 = line[lead..colon].trim().parse().ok()?;

    let tokens: Vec<&str> = line[colon + 1..].split_whitespace().collect();
    let token = *tokens.last()?;
    let identifier = canonical_device_name(token)?;

    let id_pos = line.rfind(token)?;
    let mut body = line[..id_pos].trim_end();

    let mut size_label = None;
    if tokens.len() >= 3 {
        let unit = tokens[tokens.len() - 2];
        let number = tokens[tokens.len() - 3];
        let digits = number.trim_start_matches(['*', '+']);
        if SIZE_UNITS.contains(&unit) && digits.parse::<f64>().is_ok() {
            size_label = Some(format!("{} {}", digits, unit));
            body = body[..body.len() - unit.len()].trim_end();
            body = body[..body.len() - number.len()].trim_end();
        }
    }

    let (content_type, name) = split_type_and_name(body, colon, columns);

    Some(RawPartition {
        identifier,
        index: Some(index),
        content_type,
        name,
        size_label,
        mount_point: None,
    })
}

/// Separates the TYPE and NAME columns, by header offsets when they line up.
fn split_type_and_name(body: &str, colon: usize, columns: Option<Columns>) -> (String, String) {
    if let Some(cols) = columns {
        let start = cols.name_start;
        let aligned = start > colon
            && start <= body.len()
            && body.is_char_boundary(start)
            && body[..start].ends_with(char::is_whitespace);
        if aligned {
            return (
                body[colon + 1..start].trim().to_string(),
                body[start..].trim().to_string(),
            );
        }
        if start > body.len() && body.len() > colon {
            // Nothing reaches the NAME column: the row has a type only
            return (body[colon + 1..].trim().to_string(), String::new());
        }
    }

    let mut words = body.get(colon + 1..).unwrap_or("").split_whitespace();
    let content_type = words.next().unwrap_or("").to_string();
    let name = words.collect::<Vec<_>>().join(" ");
    (content_type, name)
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
