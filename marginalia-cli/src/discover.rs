//! Metadata file discovery and device-id derivation
//!
//! KoReader sync folders are laid out as one subfolder per device, each
//! holding `BookName.sdr/metadata.<format>.lua` sidecars at arbitrary depth.
//! Device folders named after the reader's own storage (`storage`,
//! `internal`, `sdcard`) take the base folder's name instead, since the base
//! itself identifies the device in that layout.

use anyhow::Result;
use marginalia_core::ScanEntry;
use std::fs;
use std::path::Path;

/// Folder names that mean "this is the device's own storage root".
const STORAGE_FOLDERS: &[&str] = &["storage", "internal", "sdcard"];

/// Is this a KoReader metadata sidecar file name (`metadata.*.lua`)?
fn is_metadata_file(name: &str) -> bool {
    name.starts_with("metadata.") && name.ends_with(".lua")
}

/// Find every metadata file under `base`, paired with its device id.
///
/// `device_label` overrides derivation for the whole base folder. Entries
/// come back in sorted path order so repeated scans are deterministic.
pub fn find_metadata_files(base: &Path, device_label: Option<&str>) -> Result<Vec<ScanEntry>> {
    let mut entries = Vec::new();
    if !base.is_dir() {
        tracing::warn!(base = %base.display(), "base path does not exist, skipping");
        return Ok(entries);
    }

    let base_name = base
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    for folder in sorted_dir(base)? {
        if !folder.is_dir() {
            continue;
        }
        let folder_name = folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        let device_id = match device_label {
            Some(label) => label,
            None if STORAGE_FOLDERS.contains(&folder_name.to_ascii_lowercase().as_str()) => {
                base_name
            }
            None => folder_name,
        };

        let mut files = Vec::new();
        walk(&folder, &mut files)?;
        entries.extend(
            files
                .into_iter()
                .map(|path| ScanEntry::new(path, device_id)),
        );
    }

    Ok(entries)
}

fn sorted_dir(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    paths.sort();
    Ok(paths)
}

fn walk(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> Result<()> {
    for path in sorted_dir(dir)? {
        if path.is_dir() {
            walk(&path, out)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_metadata_file)
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &TempDir, rel: &str) {
        let path = root.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "return {}").unwrap();
    }

    #[test]
    fn finds_sidecars_and_derives_device_ids() {
        let root = TempDir::new().unwrap();
        touch(&root, "boox-palma/Dune.sdr/metadata.epub.lua");
        touch(&root, "boox-palma/Other.sdr/metadata.pdf.lua");
        touch(&root, "s24u/Dune.sdr/metadata.epub.lua");
        touch(&root, "s24u/Dune.sdr/cover.jpg");
        touch(&root, "s24u/notes.txt");

        let entries = find_metadata_files(root.path(), None).unwrap();
        assert_eq!(entries.len(), 3);
        let devices: Vec<_> = entries.iter().map(|e| e.device_id.as_str()).collect();
        assert_eq!(devices, vec!["boox-palma", "boox-palma", "s24u"]);
    }

    #[test]
    fn storage_folder_takes_base_name() {
        let root = TempDir::new().unwrap();
        touch(&root, "Storage/Book.sdr/metadata.epub.lua");

        let entries = find_metadata_files(root.path(), None).unwrap();
        assert_eq!(entries.len(), 1);
        let base_name = root.path().file_name().unwrap().to_str().unwrap();
        assert_eq!(entries[0].device_id, base_name);
    }

    #[test]
    fn explicit_label_wins() {
        let root = TempDir::new().unwrap();
        touch(&root, "whatever/Book.sdr/metadata.epub.lua");

        let entries = find_metadata_files(root.path(), Some("kobo-libra")).unwrap();
        assert_eq!(entries[0].device_id, "kobo-libra");
    }

    #[test]
    fn missing_base_is_empty_not_error() {
        let entries = find_metadata_files(Path::new("/does/not/exist"), None).unwrap();
        assert!(entries.is_empty());
    }
}
