use tracing::debug;

use super::{rebuild, OrgNode};
use crate::classify::classify_title;

/// Name fragments of units that carry no echelon (schools, health clinics).
const UNRANKED_UNIT_MARKERS: &[&str] = &["puskesmas", "sekolah"];

/// Rebuilds the tree with an inferred `jabatan` on every node.
pub fn annotate_titles(roots: &[OrgNode]) -> Vec<OrgNode> {
    rebuild(roots, |node, parent, children| {
        let jabatan = classify_title(&node.name, node.eselon.as_ref(), parent);
        debug!(unit = %node.name, %jabatan, "classified");
        OrgNode {
            jabatan: Some(jabatan),
            children,
            ..node.clone_fields()
        }
    })
}

pub fn is_unranked_unit(name: &str) -> bool {
    let lower = name.to_lowercase();
    UNRANKED_UNIT_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Drops `eselon` from schools and health clinics. Returns the new tree and
/// the number of nodes that lost the field.
pub fn strip_school_eselon(roots: &[OrgNode]) -> (Vec<OrgNode>, usize) {
    let mut removed = 0;
    let rebuilt = rebuild(roots, |node, _, children| {
        let mut out = OrgNode {
            children,
            ..node.clone_fields()
        };
        if out.eselon.is_some() && is_unranked_unit(&node.name) {
            out.eselon = None;
            removed += 1;
            debug!(unit = %node.name, "removed eselon");
        }
        out
    });
    (rebuilt, removed)
}

impl OrgNode {
    /// Copies every field except `children`, which `rebuild` supplies.
    fn clone_fields(&self) -> OrgNode {
        OrgNode {
            name: self.name.clone(),
            jabatan: self.jabatan.clone(),
            eselon: self.eselon.clone(),
            children: Vec::new(),
            catatan: self.catatan.clone(),
            extra: self.extra.clone(),
        }
    }
}
