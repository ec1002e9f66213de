//! Tabular exports: one row per unit, and parent/child relation tables.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};
use serde::Serialize;
use tracing::info;

use crate::classify::{classify_code, classify_title, simplify_title};
use crate::error::{Error, Result};
use crate::hierarchy::{flatten, OrgNode, Relation};

pub const UNIT_HEADERS: [&str; 7] = [
    "nama_unit",
    "nama_parent",
    "eselon",
    "jabatan",
    "jabatan_lengkap",
    "kode_jabatan",
    "catatan",
];
pub const RELATION_HEADERS: [&str; 2] = ["parent", "child"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRow {
    pub nama_unit: String,
    pub nama_parent: String,
    pub eselon: String,
    pub jabatan: String,
    pub jabatan_lengkap: String,
    pub kode_jabatan: String,
    pub catatan: String,
}

impl UnitRow {
    fn cells(&self) -> [&str; 7] {
        [
            &self.nama_unit,
            &self.nama_parent,
            &self.eselon,
            &self.jabatan,
            &self.jabatan_lengkap,
            &self.kode_jabatan,
            &self.catatan,
        ]
    }
}

/// Pre-order rows. A stored `jabatan` is used as the full title; nodes without
/// one get an inferred title.
pub fn unit_rows(roots: &[OrgNode]) -> Vec<UnitRow> {
    flatten(roots, |node, parent| {
        let full = node
            .jabatan
            .clone()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| classify_title(&node.name, node.eselon.as_ref(), parent));
        Some(UnitRow {
            nama_unit: node.name.clone(),
            nama_parent: parent.unwrap_or_default().to_string(),
            eselon: node
                .eselon
                .as_ref()
                .map(|e| e.as_str().to_string())
                .unwrap_or_default(),
            jabatan: simplify_title(&full),
            kode_jabatan: classify_code(&full, &node.name).to_string(),
            jabatan_lengkap: full,
            catatan: node.catatan.clone().unwrap_or_default(),
        })
    })
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x366092))
        .set_align(FormatAlign::Center)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn write_sheet<'a, R>(
    path: &Path,
    sheet_name: &str,
    headers: &[&str],
    widths: &[f64],
    rows: R,
) -> Result<usize>
where
    R: IntoIterator<Item = Vec<&'a str>>,
{
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;
    let header = header_format();
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    let mut written = 0;
    for (index, row) in rows.into_iter().enumerate() {
        let excel_row = (index + 1) as u32;
        for (col, value) in row.into_iter().enumerate() {
            sheet.write_string(excel_row, col as u16, value)?;
        }
        written += 1;
    }
    create_parent_dir(path)?;
    workbook.save(path)?;
    info!(path = %path.display(), rows = written, "wrote spreadsheet");
    Ok(written)
}

pub fn write_units_xlsx(path: &Path, rows: &[UnitRow]) -> Result<usize> {
    write_sheet(
        path,
        "Hierarchy",
        &UNIT_HEADERS,
        &[60.0, 60.0, 10.0, 30.0, 60.0, 18.0, 40.0],
        rows.iter().map(|row| row.cells().to_vec()),
    )
}

pub fn write_relations_xlsx(path: &Path, relations: &[Relation]) -> Result<usize> {
    write_sheet(
        path,
        "Relationships",
        &RELATION_HEADERS,
        &[60.0, 60.0],
        relations
            .iter()
            .map(|r| vec![r.parent.as_str(), r.child.as_str()]),
    )
}

pub fn write_relations_csv(path: &Path, relations: &[Relation]) -> Result<usize> {
    create_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    if relations.is_empty() {
        writer.write_record(RELATION_HEADERS)?;
    }
    for relation in relations {
        writer.serialize(relation)?;
    }
    writer.flush().map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = relations.len(), "wrote csv");
    Ok(relations.len())
}
