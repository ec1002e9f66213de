//! Regenerates `sd_negeri_<key>.json` from a manually downloaded Dapodik
//! export (CSV or Excel). Columns used:
//!   `Bentuk Pendidikan`, `Status Sekolah`, `Kecamatan`, `NPSN`,
//!   `Nama Sekolah`, `Alamat`, `Desa/Kelurahan`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use calamine::Reader;
use tracing::{info, warn};

use super::{Region, SchoolRecord, STATUS_NEGERI};
use crate::error::{Error, Result};
use crate::hierarchy::{write_backup, write_json, BackupStyle};

pub const DATA_SOURCE_URL: &str = "https://data.kemendikdasmen.go.id/data-induk";

const COL_LEVEL: &str = "Bentuk Pendidikan";
const COL_STATUS: &str = "Status Sekolah";
const COL_KECAMATAN: &str = "Kecamatan";
const COL_NPSN: &str = "NPSN";
const COL_NAME: &str = "Nama Sekolah";
const COL_ADDRESS: &str = "Alamat";
const COL_VILLAGE: &str = "Desa/Kelurahan";

/// Automatic fetching from the ministry site is not implemented; callers
/// get no records and should switch to a manual download.
pub fn fetch_from_website(region: &Region) -> Vec<SchoolRecord> {
    warn!(
        kecamatan = region.name,
        "automatic fetching is not implemented; use --manual with a file from {DATA_SOURCE_URL}"
    );
    Vec::new()
}

/// One spreadsheet row keyed by header name.
type Row = HashMap<String, String>;

pub fn load_manual(path: &Path, region: &Region) -> Result<Vec<SchoolRecord>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let rows = match extension.as_deref() {
        Some("csv") => read_csv_rows(path)?,
        Some("xls") | Some("xlsx") => read_workbook_rows(path)?,
        _ => return Err(Error::UnsupportedFormat(path.to_path_buf())),
    };
    let schools = select_region_schools(&rows, region);
    info!(kecamatan = region.name, schools = schools.len(), "loaded manual data");
    Ok(schools)
}

fn read_csv_rows(path: &Path) -> Result<Vec<Row>> {
    let raw = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(raw.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(|v| v.trim().to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

fn read_workbook_rows(path: &Path) -> Result<Vec<Row>> {
    let workbook_error = |message: String| Error::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|err| workbook_error(err.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| workbook_error("no sheets in workbook".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|err| workbook_error(err.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(cell_text).collect();
    Ok(rows
        .map(|row| {
            headers
                .iter()
                .cloned()
                .zip(row.iter().map(cell_text))
                .collect()
        })
        .collect())
}

pub fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.trim().to_string(),
        calamine::Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn column<'a>(row: &'a Row, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Public elementary schools (`SD`, `NEGERI`) located in `region`.
pub fn select_region_schools(rows: &[Row], region: &Region) -> Vec<SchoolRecord> {
    rows.iter()
        .filter(|row| {
            contains_ci(column(row, COL_LEVEL), "SD")
                && contains_ci(column(row, COL_STATUS), STATUS_NEGERI)
                && contains_ci(column(row, COL_KECAMATAN), region.name)
        })
        .enumerate()
        .map(|(index, row)| SchoolRecord {
            no: (index + 1).to_string(),
            npsn: column(row, COL_NPSN).to_string(),
            nama_sekolah: column(row, COL_NAME).to_string(),
            alamat: column(row, COL_ADDRESS).to_string(),
            kelurahan: column(row, COL_VILLAGE).to_string(),
            status: STATUS_NEGERI.to_string(),
        })
        .collect()
}

/// Drops incomplete records and renumbers the rest from 1.
pub fn prepare_records(schools: Vec<SchoolRecord>) -> (Vec<SchoolRecord>, usize) {
    let total = schools.len();
    let mut valid: Vec<SchoolRecord> = schools.into_iter().filter(SchoolRecord::is_complete).collect();
    for (index, school) in valid.iter_mut().enumerate() {
        school.no = (index + 1).to_string();
    }
    let skipped = total - valid.len();
    (valid, skipped)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    NoData,
    DryRun { records: usize },
    Written { path: PathBuf, backup: Option<PathBuf>, records: usize },
}

pub fn write_region_file(
    dir: &Path,
    region: &Region,
    schools: Vec<SchoolRecord>,
    dry_run: bool,
) -> Result<UpdateOutcome> {
    let path = dir.join(region.file_name());
    let (records, skipped) = prepare_records(schools);
    if skipped > 0 {
        warn!(file = %path.display(), skipped, "incomplete records skipped");
    }
    if records.is_empty() {
        return Ok(UpdateOutcome::NoData);
    }
    if dry_run {
        return Ok(UpdateOutcome::DryRun {
            records: records.len(),
        });
    }
    let backup = if path.exists() {
        Some(write_backup(&path, BackupStyle::Suffix)?)
    } else {
        None
    };
    write_json(&path, &records)?;
    Ok(UpdateOutcome::Written {
        path,
        backup,
        records: records.len(),
    })
}
