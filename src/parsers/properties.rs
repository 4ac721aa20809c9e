//! `Key: Value` property listings such as `diskutil info <id>`.

use std::path::PathBuf;

/// Ordered key/value pairs; lookups are case-insensitive on the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
}

impl PropertyMap {
    /// Non-empty value for `key`, first occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, v)| k.eq_ignore_ascii_case(key) && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value among several candidate keys.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mount_point(&self) -> Option<PathBuf> {
        self.get("Mount Point").map(PathBuf::from)
    }

    /// Skips placeholders such as `Not applicable (no file system)`.
    pub fn media_name(&self) -> Option<&str> {
        ["Device / Media Name", "Media Name", "Volume Name"]
            .iter()
            .filter_map(|k| self.get(k))
            .find(|v| !v.starts_with("Not applicable"))
    }

    /// Size with the parenthesised byte count stripped, `16.0 GB`.
    pub fn size_label(&self) -> Option<String> {
        self.get_any(&["Disk Size", "Total Size", "Volume Total Space"])
            .map(|v| v.split(" (").next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Parses every `Key: Value` line; other lines are ignored.
pub fn parse_properties(output: &str) -> PropertyMap {
    let entries = output
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect();

    PropertyMap { entries }
}
