//! Mount table (`mount`) and root-volume (`df /`) output.

use super::parse_properties;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: PathBuf,
    pub fs_type: String,
}

impl MountEntry {
    /// Device identifier without the `/dev/` prefix.
    pub fn device_name(&self) -> &str {
        self.device.strip_prefix("/dev/").unwrap_or(&self.device)
    }

    pub fn is_root(&self) -> bool {
        self.mount_point.as_os_str() == "/"
    }
}

/// Parses BSD (`dev on /path (msdos, local)`) and Linux
/// (`dev on /path type vfat (rw)`) mount table lines.
pub fn parse_mount_table(output: &str) -> Vec<MountEntry> {
    output.lines().filter_map(parse_mount_line).collect()
}

fn parse_mount_line(line: &str) -> Option<MountEntry> {
    let (device, rest) = line.trim().split_once(" on ")?;
    let device = device.trim();
    if device.is_empty() {
        return None;
    }

    let (mount_point, fs_type) = if let Some((path, after)) = rest.split_once(" type ") {
        let fs = after.split_whitespace().next()?;
        (path, fs.to_string())
    } else {
        let open = rest.rfind(" (")?;
        let options = rest[open + 2..].trim_end().strip_suffix(')')?;
        let fs = options.split(',').next()?.trim();
        (&rest[..open], fs.to_string())
    };

    let mount_point = mount_point.trim();
    if mount_point.is_empty() || fs_type.is_empty() {
        return None;
    }

    Some(MountEntry {
        device: device.to_string(),
        mount_point: PathBuf::from(mount_point),
        fs_type,
    })
}

/// Device node backing `/`, from `df /` or a full mount table listing.
pub fn parse_root_device(output: &str) -> Option<String> {
    for line in output.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() >= 2 && tokens[0].starts_with("/dev/") && tokens.last() == Some(&"/") {
            return Some(tokens[0].to_string());
        }
    }

    if let Some(entry) = parse_mount_table(output).into_iter().find(MountEntry::is_root) {
        return Some(entry.device);
    }

    // `diskutil info /` style listing
    let props = parse_properties(output);
    if props.get("Mount Point") == Some("/") {
        return props
            .get("Device Node")
            .map(str::to_string)
            .or_else(|| props.get("Device Identifier").map(|id| format!("/dev/{}", id)));
    }

    None
}
