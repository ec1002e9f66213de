//! Default file locations, optionally overridden by a YAML settings file.
//!
//! ```yaml
//! hierarchy_path: data/hierarchy.json
//! schools_dir: data/schools
//! merge_target: Dinas Pendidikan
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schools::merge::DEFAULT_MERGE_TARGET;

pub const CONFIG_ENV: &str = "HIRARKI_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "hirarki.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub hierarchy_path: PathBuf,
    pub export_path: PathBuf,
    pub schools_dir: PathBuf,
    pub merge_target: String,
    /// Raw "child - parent - grandparent" lines read by `build`.
    pub source_text: PathBuf,
    pub relationships_json: PathBuf,
    pub relationships_csv: PathBuf,
    pub relationships_xlsx: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hierarchy_path: PathBuf::from("hierarchy.json"),
            export_path: PathBuf::from("hierarchy_export.xlsx"),
            schools_dir: PathBuf::from("."),
            merge_target: DEFAULT_MERGE_TARGET.to_string(),
            source_text: PathBuf::from("pasted.txt"),
            relationships_json: PathBuf::from("hierarchy.json"),
            relationships_csv: PathBuf::from("relationships.csv"),
            relationships_xlsx: PathBuf::from("relationships.xlsx"),
        }
    }
}

impl Settings {
    pub fn from_yaml(path: &Path, raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &raw)
    }

    /// `$HIRARKI_CONFIG` must exist when set; `./hirarki.yaml` is optional.
    pub fn load() -> Result<Self> {
        if let Some(explicit) = env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                return Err(Error::NotFound(path));
            }
            debug!(path = %path.display(), "loading settings");
            return Self::from_file(&path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            debug!(path = %local.display(), "loading settings");
            return Self::from_file(local);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let settings = Settings::from_yaml(
            Path::new("hirarki.yaml"),
            "schools_dir: data/schools\nmerge_target: Dinas Pendidikan dan Kebudayaan\n",
        )
        .unwrap();
        assert_eq!(settings.schools_dir, PathBuf::from("data/schools"));
        assert_eq!(settings.merge_target, "Dinas Pendidikan dan Kebudayaan");
        assert_eq!(settings.hierarchy_path, PathBuf::from("hierarchy.json"));
        assert_eq!(settings.relationships_csv, PathBuf::from("relationships.csv"));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let settings = Settings::from_yaml(Path::new("hirarki.yaml"), "\n").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn malformed_yaml_names_the_file() {
        let err = Settings::from_yaml(Path::new("conf/hirarki.yaml"), "schools_dir: [unclosed")
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("conf/hirarki.yaml"));
    }
}
