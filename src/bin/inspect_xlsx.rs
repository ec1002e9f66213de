//! Print the sheets and first rows of a spreadsheet, e.g. a Dapodik download,
//! to check its column headers before `hirarki update-schools --manual`.
//! Usage: inspect_xlsx <path-to.xlsx> [sheet] [rows]

use std::path::Path;

use calamine::Reader;
use hirarki::schools::update::cell_text;

const DEFAULT_ROWS: usize = 25;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or("Usage: inspect_xlsx <path-to.xlsx> [sheet] [rows]")?;
    let wanted_sheet = args.next();
    let rows: usize = match args.next() {
        Some(raw) => raw.parse()?,
        None => DEFAULT_ROWS,
    };

    let path = Path::new(&path);
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    let mut wb = calamine::open_workbook_auto(path)?;
    let names = wb.sheet_names();
    println!("Sheets ({}): {}", names.len(), names.join(", "));

    let sheet_name = match &wanted_sheet {
        Some(wanted) => names
            .iter()
            .find(|name| *name == wanted)
            .ok_or_else(|| format!("No sheet named '{wanted}'"))?,
        None => names.first().ok_or("No sheets")?,
    };
    println!("\nUsing sheet: {}", sheet_name);

    let range = wb.worksheet_range(sheet_name)?;
    let (height, width) = range.get_size();
    println!("Size: {} rows x {} cols\nFirst {} rows:", height, width, rows.min(height));

    for (i, row) in range.rows().take(rows).enumerate() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        println!("  {}: {}", i, cells.join(" | "));
    }
    Ok(())
}
