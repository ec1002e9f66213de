use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::OrgNode;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStyle {
    /// `<file>.bak`
    Suffix,
    /// `<file>.backup_YYYYmmdd_HHMMSS`
    Timestamped,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, serialized).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_hierarchy(path: &Path) -> Result<Vec<OrgNode>> {
    let roots: Vec<OrgNode> = read_json(path)?;
    info!(path = %path.display(), roots = roots.len(), "loaded hierarchy");
    Ok(roots)
}

pub fn save_hierarchy(path: &Path, roots: &[OrgNode]) -> Result<()> {
    write_json(path, roots)?;
    info!(path = %path.display(), "wrote hierarchy");
    Ok(())
}

pub fn backup_path(path: &Path, style: BackupStyle) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    match style {
        BackupStyle::Suffix => name.push(".bak"),
        BackupStyle::Timestamped => {
            name.push(format!(
                ".backup_{}",
                chrono::Local::now().format("%Y%m%d_%H%M%S")
            ));
        }
    }
    PathBuf::from(name)
}

/// Copies the file's current bytes aside before it is overwritten.
pub fn write_backup(path: &Path, style: BackupStyle) -> Result<PathBuf> {
    let backup = backup_path(path, style);
    fs::copy(path, &backup).map_err(|source| Error::Write {
        path: backup.clone(),
        source,
    })?;
    info!(backup = %backup.display(), "created backup");
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_backup_appends_bak() {
        let path = Path::new("data/hierarchy.json");
        assert_eq!(
            backup_path(path, BackupStyle::Suffix),
            PathBuf::from("data/hierarchy.json.bak")
        );
    }

    #[test]
    fn timestamped_backup_carries_date_and_time() {
        let backup = backup_path(Path::new("hierarchy.json"), BackupStyle::Timestamped);
        let name = backup.to_string_lossy();
        let stamp = name
            .strip_prefix("hierarchy.json.backup_")
            .expect("backup keeps the original name");
        assert_eq!(stamp.len(), "20240101_120000".len());
        assert_eq!(stamp.as_bytes()[8], b'_');
    }

    #[test]
    fn read_json_distinguishes_missing_from_malformed() {
        let dir = std::env::temp_dir().join(format!("hirarki-io-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let missing = dir.join("missing.json");
        assert!(matches!(
            read_json::<Vec<OrgNode>>(&missing),
            Err(Error::NotFound(_))
        ));
        let broken = dir.join("broken.json");
        fs::write(&broken, "[{\"name\": ").unwrap();
        assert!(matches!(
            read_json::<Vec<OrgNode>>(&broken),
            Err(Error::Parse { .. })
        ));
        let _ = fs::remove_dir_all(dir);
    }
}
