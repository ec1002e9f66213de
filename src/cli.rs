use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::export::{unit_rows, write_relations_csv, write_relations_xlsx, write_units_xlsx};
use crate::hierarchy::{
    annotate_titles, count_nodes, load_hierarchy, parse_lines, read_json, save_hierarchy,
    strip_school_eselon, write_backup, write_json, BackupStyle,
};
use crate::logging;
use crate::schools::update::{
    fetch_from_website, load_manual, write_region_file, UpdateOutcome, DATA_SOURCE_URL,
};
use crate::schools::{
    merge_schools, region_by_key, regions, school_files, validate_file, FileValidation, Region,
    SchoolRecord, ValidationSeverity,
};

/// Errors printed per invalid file unless `-v` is given.
const MAX_LISTED_ERRORS: usize = 10;
const MAX_LISTED_ROOTS: usize = 20;

#[derive(Debug, Parser)]
#[command(
    name = "hirarki",
    version,
    about = "Maintain the regency organizational hierarchy and its school lists"
)]
pub struct Cli {
    /// Raise log level (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Infer and store `jabatan` on every node.
    Annotate {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove `eselon` from school and puskesmas nodes.
    StripEselon {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Flatten the hierarchy into a spreadsheet.
    Export {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the hierarchy and relation tables from "child - parent" lines.
    Build {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        json: Option<PathBuf>,
        #[arg(short, long)]
        csv: Option<PathBuf>,
        #[arg(short = 'x', long)]
        excel: Option<PathBuf>,
        #[arg(long)]
        print_summary: bool,
    },
    /// Add schools from sd_negeri_*.json files missing under the target node.
    MergeSchools {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        schools_dir: Option<PathBuf>,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate sd_negeri_*.json school files.
    Validate {
        /// A single file; otherwise every sd_negeri_*.json in --dir.
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Regenerate school files from a manually downloaded Dapodik export.
    UpdateSchools {
        /// CSV, XLS or XLSX export.
        #[arg(short, long)]
        manual: Option<PathBuf>,
        #[arg(short, long)]
        kecamatan: Option<String>,
        #[arg(short, long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    logging::init(cli.verbose);

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    let verbose = cli.verbose > 0;
    let outcome = match cli.command {
        Command::Annotate { input, dry_run } => {
            handle_annotate(&input.unwrap_or(settings.hierarchy_path), dry_run)
        }
        Command::StripEselon { input, dry_run } => {
            handle_strip_eselon(&input.unwrap_or(settings.hierarchy_path), dry_run)
        }
        Command::Export { input, output } => handle_export(
            &input.unwrap_or(settings.hierarchy_path),
            &output.unwrap_or(settings.export_path),
        ),
        Command::Build {
            input,
            json,
            csv,
            excel,
            print_summary,
        } => handle_build(
            &BuildPaths {
                input: input.unwrap_or(settings.source_text),
                json: json.unwrap_or(settings.relationships_json),
                csv: csv.unwrap_or(settings.relationships_csv),
                excel: excel.unwrap_or(settings.relationships_xlsx),
            },
            print_summary,
        ),
        Command::MergeSchools {
            input,
            schools_dir,
            target,
            dry_run,
        } => handle_merge(
            &input.unwrap_or(settings.hierarchy_path),
            &schools_dir.unwrap_or(settings.schools_dir),
            &target.unwrap_or(settings.merge_target),
            dry_run,
        ),
        Command::Validate { file, dir } => {
            match handle_validate(file, &dir.unwrap_or(settings.schools_dir), verbose) {
                Ok(true) => Ok(()),
                Ok(false) => return 1,
                Err(err) => Err(err),
            }
        }
        Command::UpdateSchools {
            manual,
            kecamatan,
            dir,
            dry_run,
        } => handle_update(
            manual.as_deref(),
            kecamatan.as_deref(),
            &dir.unwrap_or(settings.schools_dir),
            dry_run,
        ),
    };

    match outcome {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

fn handle_annotate(path: &Path, dry_run: bool) -> Result<()> {
    let roots = load_hierarchy(path)?;
    let annotated = annotate_titles(&roots);
    let total = count_nodes(&annotated);
    if dry_run {
        for root in annotated.iter().take(MAX_LISTED_ROOTS) {
            println!(
                "{} -> {}",
                root.name,
                root.jabatan.as_deref().unwrap_or_default()
            );
        }
        println!("dry run: {total} nodes would be annotated in {}", path.display());
        return Ok(());
    }
    let backup = write_backup(path, BackupStyle::Suffix)?;
    save_hierarchy(path, &annotated)?;
    println!("annotated {total} nodes in {}", path.display());
    println!("backup: {}", backup.display());
    Ok(())
}

fn handle_strip_eselon(path: &Path, dry_run: bool) -> Result<()> {
    let roots = load_hierarchy(path)?;
    let (stripped, removed) = strip_school_eselon(&roots);
    if removed == 0 {
        println!("no school or puskesmas node carries eselon in {}", path.display());
        return Ok(());
    }
    if dry_run {
        println!("dry run: eselon would be removed from {removed} nodes");
        return Ok(());
    }
    let backup = write_backup(path, BackupStyle::Timestamped)?;
    save_hierarchy(path, &stripped)?;
    println!("removed eselon from {removed} nodes in {}", path.display());
    println!("backup: {}", backup.display());
    Ok(())
}

fn handle_export(input: &Path, output: &Path) -> Result<()> {
    let roots = load_hierarchy(input)?;
    let rows = unit_rows(&roots);
    let written = write_units_xlsx(output, &rows)?;
    println!("exported {written} rows to {}", output.display());
    Ok(())
}

struct BuildPaths {
    input: PathBuf,
    json: PathBuf,
    csv: PathBuf,
    excel: PathBuf,
}

fn handle_build(paths: &BuildPaths, print_summary: bool) -> Result<()> {
    if !paths.input.exists() {
        return Err(Error::NotFound(paths.input.clone()));
    }
    let text = fs::read_to_string(&paths.input).map_err(|source| Error::Read {
        path: paths.input.clone(),
        source,
    })?;
    let edges = parse_lines(&text);
    let trees = edges.build_tree()?;
    write_json(&paths.json, &trees)?;
    let relations = edges.relations();
    write_relations_csv(&paths.csv, &relations)?;
    write_relations_xlsx(&paths.excel, &relations)?;
    info!(nodes = edges.all_nodes.len(), relations = relations.len(), "built hierarchy");

    if print_summary {
        let roots = edges.roots();
        println!("Input: {}", paths.input.display());
        println!("Nodes: {}", edges.all_nodes.len());
        println!("Relations: {}", relations.len());
        println!("Roots: {}", roots.len());
        for root in roots.iter().take(MAX_LISTED_ROOTS) {
            println!(" - {root}");
        }
        println!(
            "Wrote: {} {} {}",
            paths.json.display(),
            paths.csv.display(),
            paths.excel.display()
        );
    }
    Ok(())
}

fn handle_merge(path: &Path, schools_dir: &Path, target: &str, dry_run: bool) -> Result<()> {
    let mut roots = load_hierarchy(path)?;
    let mut sources = Vec::new();
    for file in school_files(schools_dir)? {
        let records: Vec<SchoolRecord> = read_json(&file)?;
        sources.push((file, records));
    }
    let report = merge_schools(&mut roots, target, &sources)?;

    println!("existing children of '{target}': {}", report.existing);
    println!("schools in {} files: {}", sources.len(), report.source_schools);
    for conflict in &report.conflicts {
        println!("conflict: '{}' has different NPSN values:", conflict.name);
        for (file, npsn) in &conflict.sources {
            println!("  {npsn} in {}", file.display());
        }
    }
    if report.added.is_empty() {
        println!("no new schools to add");
        return Ok(());
    }
    for name in &report.added {
        println!("+ {name}");
    }
    if dry_run {
        println!("dry run: {} schools would be added", report.added.len());
        return Ok(());
    }
    let backup = write_backup(path, BackupStyle::Suffix)?;
    save_hierarchy(path, &roots)?;
    println!("added {} schools to {}", report.added.len(), path.display());
    println!("backup: {}", backup.display());
    Ok(())
}

/// `Ok(false)` when any file is invalid or there is nothing to validate.
fn handle_validate(file: Option<PathBuf>, dir: &Path, verbose: bool) -> Result<bool> {
    let files = match file {
        Some(file) => vec![file],
        None => school_files(dir)?,
    };
    if files.is_empty() {
        println!("No JSON files found to validate.");
        return Ok(false);
    }
    println!("Validating {} file(s)...", files.len());

    let results: Vec<FileValidation> = files.iter().map(|path| validate_file(path)).collect();
    for result in &results {
        print_file_validation(result, verbose);
    }

    let invalid_files = results.iter().filter(|r| !r.is_valid()).count();
    let total: usize = results.iter().map(|r| r.report.total_records).sum();
    let invalid_records: usize = results.iter().map(|r| r.report.invalid_records).sum();
    println!();
    println!("Files validated: {}", results.len());
    println!("  valid: {}", results.len() - invalid_files);
    if invalid_files > 0 {
        println!("  invalid: {invalid_files}");
    }
    println!("School records: {total}");
    println!("  valid: {}", total - invalid_records);
    if invalid_records > 0 {
        println!("  invalid: {invalid_records}");
    }

    if invalid_files == 0 {
        println!("All files are valid.");
        Ok(true)
    } else {
        println!("Some files have validation errors.");
        Ok(false)
    }
}

fn print_file_validation(result: &FileValidation, verbose: bool) {
    let name = result
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| result.path.display().to_string());
    let report = &result.report;
    if result.is_valid() {
        println!("ok   {name}: {} records", report.total_records);
    } else {
        println!(
            "FAIL {name}: {} of {} records invalid",
            report.invalid_records, report.total_records
        );
    }

    let errors: Vec<_> = report.errors().collect();
    let shown = if verbose { errors.len() } else { errors.len().min(MAX_LISTED_ERRORS) };
    for diag in &errors[..shown] {
        println!("    {diag}");
    }
    if shown < errors.len() {
        println!("    ... and {} more errors (use -v to list all)", errors.len() - shown);
    }
    if verbose {
        for diag in report
            .diagnostics
            .iter()
            .filter(|d| d.severity == ValidationSeverity::Warning)
        {
            println!("    {diag}");
        }
    }
}

fn handle_update(
    manual: Option<&Path>,
    kecamatan: Option<&str>,
    dir: &Path,
    dry_run: bool,
) -> Result<()> {
    let selected: Vec<Region> = match kecamatan {
        Some(key) => vec![region_by_key(key)?],
        None => regions().collect(),
    };
    println!("Processing {} kecamatan(s)...", selected.len());

    for region in &selected {
        let schools = match manual {
            Some(path) => load_manual(path, region)?,
            None => {
                let fetched = fetch_from_website(region);
                if fetched.is_empty() {
                    println!(
                        "{}: no data fetched; download it from {DATA_SOURCE_URL} and pass --manual",
                        region.name
                    );
                    continue;
                }
                fetched
            }
        };
        match write_region_file(dir, region, schools, dry_run)? {
            UpdateOutcome::NoData => println!("{}: no valid records, file left as is", region.name),
            UpdateOutcome::DryRun { records } => {
                println!("{}: dry run, would write {records} records", region.name)
            }
            UpdateOutcome::Written {
                path,
                backup,
                records,
            } => {
                println!("{}: wrote {records} records to {}", region.name, path.display());
                if let Some(backup) = backup {
                    println!("  backup: {}", backup.display());
                }
            }
        }
    }

    if dry_run {
        println!("This was a dry run. No files were modified.");
    }
    Ok(())
}
