//! Per-kecamatan school lists (`sd_negeri_<key>.json`): validation, merging
//! into the hierarchy, and regeneration from manual downloads.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod merge;
pub mod update;
pub mod validate;

pub use merge::{merge_schools, MergeConflict, MergeReport};
pub use validate::{
    validate_file, validate_file_with, validate_records, FileValidation, ValidationDiagnostic, ValidationReport,
    ValidationSeverity,
};

pub const SCHOOL_FILE_PREFIX: &str = "sd_negeri_";
pub const REQUIRED_FIELDS: &[&str] = &["No", "NPSN", "Nama Sekolah", "Alamat", "Kelurahan", "Status"];
pub const STATUS_NEGERI: &str = "NEGERI";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRecord {
    #[serde(rename = "No", default)]
    pub no: String,
    #[serde(rename = "NPSN", default)]
    pub npsn: String,
    #[serde(rename = "Nama Sekolah", default)]
    pub nama_sekolah: String,
    #[serde(rename = "Alamat", default)]
    pub alamat: String,
    #[serde(rename = "Kelurahan", default)]
    pub kelurahan: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

impl SchoolRecord {
    pub fn is_complete(&self) -> bool {
        [
            &self.no,
            &self.npsn,
            &self.nama_sekolah,
            &self.alamat,
            &self.kelurahan,
            &self.status,
        ]
        .iter()
        .all(|value| !value.trim().is_empty())
    }
}

/// Kecamatan of Kabupaten Banyumas: file key -> display name.
pub const KECAMATAN: &[(&str, &str)] = &[
    ("ajibarang", "Ajibarang"),
    ("banyumas", "Banyumas"),
    ("baturaden", "Baturaden"),
    ("cilongok", "Cilongok"),
    ("gumelar", "Gumelar"),
    ("jatilawang", "Jatilawang"),
    ("kalibagor", "Kalibagor"),
    ("karanglewas", "Karanglewas"),
    ("kebasen", "Kebasen"),
    ("kedung_banteng", "Kedungbanteng"),
    ("kembaran", "Kembaran"),
    ("kemranjen", "Kemranjen"),
    ("lumbir", "Lumbir"),
    ("patikraja", "Patikraja"),
    ("pekuncen", "Pekuncen"),
    ("purwojati", "Purwojati"),
    ("purwokerto_barat", "Purwokerto Barat"),
    ("purwokerto_selatan", "Purwokerto Selatan"),
    ("purwokerto_timur", "Purwokerto Timur"),
    ("purwokerto_utara", "Purwokerto Utara"),
    ("rawalo", "Rawalo"),
    ("sokaraja", "Sokaraja"),
    ("somagede", "Somagede"),
    ("sumbang", "Sumbang"),
    ("sumpiuh", "Sumpiuh"),
    ("tambak", "Tambak"),
    ("wangon", "Wangon"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub key: &'static str,
    pub name: &'static str,
}

impl Region {
    pub fn file_name(&self) -> String {
        format!("{SCHOOL_FILE_PREFIX}{}.json", self.key)
    }

    /// Substring every school name in this region's file must contain.
    pub fn required_name_fragment(&self) -> String {
        format!("Kecamatan {}", self.name)
    }
}

pub fn regions() -> impl Iterator<Item = Region> {
    KECAMATAN.iter().map(|&(key, name)| Region { key, name })
}

pub fn region_by_key(key: &str) -> Result<Region> {
    regions()
        .find(|region| region.key == key)
        .ok_or_else(|| Error::UnknownRegion {
            key: key.to_string(),
            available: KECAMATAN
                .iter()
                .map(|(key, _)| *key)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Region whose file this is, judged by `sd_negeri_<key>.json`.
pub fn region_for_file(path: &Path) -> Option<Region> {
    let stem = path.file_stem()?.to_str()?;
    let key = stem.strip_prefix(SCHOOL_FILE_PREFIX)?;
    regions().find(|region| region.key == key)
}

/// All `sd_negeri_*.json` files in `dir`, sorted by name.
pub fn school_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_school_file = path.is_file()
            && path.extension().is_some_and(|ext| ext == "json")
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(SCHOOL_FILE_PREFIX));
        if is_school_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
