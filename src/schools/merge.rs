use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::{info, warn};

use super::SchoolRecord;
use crate::error::{Error, Result};
use crate::hierarchy::{find_by_name_mut, OrgNode};

pub const DEFAULT_MERGE_TARGET: &str = "Dinas Pendidikan";

/// Two source records share a school name but not an NPSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub name: String,
    pub sources: Vec<(PathBuf, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub existing: usize,
    pub source_schools: usize,
    pub added: Vec<String>,
    pub conflicts: Vec<MergeConflict>,
}

/// Appends a leaf under `target` for every source school whose name is not
/// already a child of it. Names are compared exactly.
pub fn merge_schools(
    roots: &mut [OrgNode],
    target: &str,
    sources: &[(PathBuf, Vec<SchoolRecord>)],
) -> Result<MergeReport> {
    let node = find_by_name_mut(roots, target)
        .ok_or_else(|| Error::TargetNotFound(target.to_string()))?;

    let existing: BTreeSet<String> = node.children.iter().map(|c| c.name.clone()).collect();

    let mut by_name: BTreeMap<&str, Vec<(&PathBuf, &str)>> = BTreeMap::new();
    for (path, records) in sources {
        for record in records {
            let name = record.nama_sekolah.trim();
            if name.is_empty() {
                continue;
            }
            by_name
                .entry(name)
                .or_default()
                .push((path, record.npsn.trim()));
        }
    }

    let mut report = MergeReport {
        existing: existing.len(),
        source_schools: by_name.len(),
        ..MergeReport::default()
    };

    for (name, occurrences) in by_name {
        let distinct_npsn: BTreeSet<&str> = occurrences.iter().map(|(_, npsn)| *npsn).collect();
        if distinct_npsn.len() > 1 {
            warn!(school = name, count = occurrences.len(), "same name with different NPSN, not merged");
            report.conflicts.push(MergeConflict {
                name: name.to_string(),
                sources: occurrences
                    .iter()
                    .map(|(path, npsn)| ((*path).clone(), (*npsn).to_string()))
                    .collect(),
            });
            continue;
        }
        if existing.contains(name) {
            continue;
        }
        node.children.push(OrgNode::new(name));
        report.added.push(name.to_string());
        info!(school = name, "added");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, npsn: &str) -> SchoolRecord {
        SchoolRecord {
            nama_sekolah: name.to_string(),
            npsn: npsn.to_string(),
            ..SchoolRecord::default()
        }
    }

    fn hierarchy() -> Vec<OrgNode> {
        vec![OrgNode::new("Pemerintah Kabupaten Banyumas").with_children(vec![
            OrgNode::new("Dinas Pendidikan").with_children(vec![
                OrgNode::new("Sekretariat"),
                OrgNode::new("SD Negeri 2 Ajibarang"),
            ]),
        ])]
    }

    #[test]
    fn adds_exactly_one_leaf_per_missing_school() {
        let mut roots = hierarchy();
        let sources = vec![(
            PathBuf::from("sd_negeri_ajibarang.json"),
            vec![
                record("SD Negeri 1 Ajibarang", "20302001"),
                record("SD Negeri 2 Ajibarang", "20302002"),
            ],
        )];
        let report = merge_schools(&mut roots, DEFAULT_MERGE_TARGET, &sources).unwrap();
        assert_eq!(report.added, ["SD Negeri 1 Ajibarang"]);
        assert_eq!(report.existing, 2);

        let dinas = &roots[0].children[0];
        let added: Vec<_> = dinas
            .children
            .iter()
            .filter(|c| c.name == "SD Negeri 1 Ajibarang")
            .collect();
        assert_eq!(added.len(), 1);
        assert!(added[0].children.is_empty());
        assert_eq!(dinas.children.len(), 3);

        let again = merge_schools(&mut roots, DEFAULT_MERGE_TARGET, &sources).unwrap();
        assert!(again.added.is_empty());
        assert_eq!(roots[0].children[0].children.len(), 3);
    }

    #[test]
    fn same_record_in_two_files_is_added_once() {
        let mut roots = hierarchy();
        let sources = vec![
            (PathBuf::from("a.json"), vec![record("SD Negeri 3 Wangon", "20301003")]),
            (PathBuf::from("b.json"), vec![record("SD Negeri 3 Wangon", "20301003")]),
        ];
        let report = merge_schools(&mut roots, DEFAULT_MERGE_TARGET, &sources).unwrap();
        assert_eq!(report.added.len(), 1);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn ambiguous_names_across_regions_are_reported_not_merged() {
        let mut roots = hierarchy();
        let sources = vec![
            (PathBuf::from("sd_negeri_lumbir.json"), vec![record("SD Negeri 1 Cidora", "20301111")]),
            (PathBuf::from("sd_negeri_gumelar.json"), vec![record("SD Negeri 1 Cidora", "20302222")]),
        ];
        let report = merge_schools(&mut roots, DEFAULT_MERGE_TARGET, &sources).unwrap();
        assert!(report.added.is_empty());
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].sources.len(), 2);
    }

    #[test]
    fn missing_target_is_an_error() {
        let mut roots = vec![OrgNode::new("Dinas Kesehatan")];
        let err = merge_schools(&mut roots, DEFAULT_MERGE_TARGET, &[]).unwrap_err();
        assert!(matches!(err, Error::TargetNotFound(name) if name == "Dinas Pendidikan"));
    }
}
