//! Finds an EFI partition that is already mounted.
//!
//! Three probes run in order, each hit checked to exist on disk:
//! 1. mount table entries of the FAT or HFS family other than `/`
//! 2. children of the volumes root named `EFI` or holding an `EFI` directory
//! 3. a bounded search for the bootloader configuration file, ascending from
//!    it to the volume that contains it

use crate::command::{argv, CommandPort};
use crate::config::EngineConfig;
use crate::parsers::{parse_mount_table, MountEntry};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const EFI_DIR: &str = "EFI";

/// Filesystem type prefixes an EFI volume can be mounted as.
const EFI_FS_TYPES: [&str; 4] = ["msdos", "vfat", "fat", "hfs"];

pub struct EfiLocator<'a, P: CommandPort + ?Sized> {
    port: &'a P,
    config: &'a EngineConfig,
}

impl<'a, P: CommandPort + ?Sized> EfiLocator<'a, P> {
    pub fn new(port: &'a P, config: &'a EngineConfig) -> Self {
        Self { port, config }
    }

    pub fn locate(&self) -> Option<PathBuf> {
        let hit = self
            .from_mount_table()
            .or_else(|| probe_volume_children(&self.config.volumes_root))
            .or_else(|| {
                probe_bootloader_config(
                    &self.config.volumes_root,
                    &self.config.bootloader_config_name,
                    self.config.config_search_depth,
                    self.config.config_ascend_levels,
                )
            });

        match &hit {
            Some(path) => tracing::info!(path = %path.display(), "Located mounted EFI volume"),
            None => tracing::debug!("No mounted EFI volume found"),
        }
        hit
    }

    fn from_mount_table(&self) -> Option<PathBuf> {
        let out = self.port.run(&argv(&[self.config.tools.mount.as_str()]), false);
        let entries = parse_mount_table(out.text()?);
        probe_mount_entries(&entries)
    }
}

fn is_efi_fs_type(fs_type: &str) -> bool {
    let lower = fs_type.to_lowercase();
    EFI_FS_TYPES.iter().any(|t| lower.starts_with(t))
}

/// First existing non-root mount of an EFI-capable filesystem.
pub fn probe_mount_entries(entries: &[MountEntry]) -> Option<PathBuf> {
    entries
        .iter()
        .filter(|e| !e.is_root() && is_efi_fs_type(&e.fs_type))
        .map(|e| e.mount_point.clone())
        .find(|p| p.exists())
}

/// First child of `volumes_root` that is, or contains, an `EFI` directory.
pub fn probe_volume_children(volumes_root: &Path) -> Option<PathBuf> {
    let pattern = format!(
        "{}/*",
        glob::Pattern::escape(&volumes_root.to_string_lossy())
    );
    let children = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::debug!(pattern = %pattern, error = %e, "Invalid volumes root pattern");
            return None;
        }
    };

    children.flatten().find(|child| {
        child.is_dir()
            && (child.file_name().is_some_and(|n| n == EFI_DIR) || child.join(EFI_DIR).is_dir())
    })
}

/// Volume containing the first bootloader configuration file found within
/// `max_depth` levels of `volumes_root`.
pub fn probe_bootloader_config(
    volumes_root: &Path,
    file_name: &str,
    max_depth: usize,
    ascend_levels: usize,
) -> Option<PathBuf> {
    let found = find_file(volumes_root, file_name, 0, max_depth)?;
    tracing::debug!(file = %found.display(), "Found bootloader configuration");
    ascend_to_volume(volumes_root, &found, ascend_levels)
}

fn find_file(dir: &Path, file_name: &str, level: usize, max_depth: usize) -> Option<PathBuf> {
    if level >= max_depth {
        return None;
    }

    let candidate = dir.join(file_name);
    if level > 0 && candidate.is_file() {
        return Some(candidate);
    }

    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .collect();
    subdirs.sort();

    subdirs
        .iter()
        .find_map(|sub| find_file(sub, file_name, level + 1, max_depth))
}

/// Climbs at most `ascend_levels` directories from `file` without leaving
/// the volume directly below `volumes_root`.
fn ascend_to_volume(volumes_root: &Path, file: &Path, ascend_levels: usize) -> Option<PathBuf> {
    let mut dir = file.parent()?;
    for _ in 1..ascend_levels.max(1) {
        match dir.parent() {
            Some(parent) if parent != volumes_root => dir = parent,
            _ => break,
        }
    }

    if dir == volumes_root || !dir.starts_with(volumes_root) || !dir.exists() {
        return None;
    }
    Some(dir.to_path_buf())
}

/// Most recently modified directory directly under `volumes_root`.
///
/// Only a guess at where a volume that just mounted landed.
pub fn most_recent_volume(volumes_root: &Path) -> Option<PathBuf> {
    fs::read_dir(volumes_root)
        .ok()?
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Some((modified, entry.path()))
        })
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
        .map(|(_, path)| path)
}
