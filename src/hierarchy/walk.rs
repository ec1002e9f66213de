//! Depth-first traversal over a root collection of [OrgNode]s.
//!
//! Every function visits nodes in pre-order and hands the visitor the name of
//! the node's immediate parent (`None` for roots).

use super::OrgNode;

pub fn walk<F>(roots: &[OrgNode], mut visit: F)
where
    F: FnMut(&OrgNode, Option<&str>),
{
    fn go<F: FnMut(&OrgNode, Option<&str>)>(nodes: &[OrgNode], parent: Option<&str>, visit: &mut F) {
        for node in nodes {
            visit(node, parent);
            go(&node.children, Some(&node.name), visit);
        }
    }
    go(roots, None, &mut visit);
}

/// Emitting mode: each visit yields zero or more records, concatenated in traversal order.
pub fn flatten<R, I, F>(roots: &[OrgNode], mut emit: F) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    F: FnMut(&OrgNode, Option<&str>) -> I,
{
    let mut out = Vec::new();
    walk(roots, |node, parent| out.extend(emit(node, parent)));
    out
}

/// Builds a new tree bottom-up. Children are rebuilt first, with the parent's
/// original name as context, before `build` produces the parent from its
/// original fields and the rebuilt children.
pub fn rebuild<F>(roots: &[OrgNode], mut build: F) -> Vec<OrgNode>
where
    F: FnMut(&OrgNode, Option<&str>, Vec<OrgNode>) -> OrgNode,
{
    fn go<F>(nodes: &[OrgNode], parent: Option<&str>, build: &mut F) -> Vec<OrgNode>
    where
        F: FnMut(&OrgNode, Option<&str>, Vec<OrgNode>) -> OrgNode,
    {
        nodes
            .iter()
            .map(|node| {
                let children = go(&node.children, Some(&node.name), build);
                build(node, parent, children)
            })
            .collect()
    }
    go(roots, None, &mut build)
}

pub fn find_by_name<'a>(roots: &'a [OrgNode], name: &str) -> Option<&'a OrgNode> {
    for node in roots {
        if node.name == name {
            return Some(node);
        }
        if let Some(found) = find_by_name(&node.children, name) {
            return Some(found);
        }
    }
    None
}

pub fn find_by_name_mut<'a>(roots: &'a mut [OrgNode], name: &str) -> Option<&'a mut OrgNode> {
    for node in roots {
        if node.name == name {
            return Some(node);
        }
        if let Some(found) = find_by_name_mut(&mut node.children, name) {
            return Some(found);
        }
    }
    None
}

pub fn count_nodes(roots: &[OrgNode]) -> usize {
    let mut count = 0;
    walk(roots, |_, _| count += 1);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<OrgNode> {
        vec![
            OrgNode::new("Dinas Kesehatan").with_children(vec![
                OrgNode::new("Sekretariat"),
                OrgNode::new("Bidang Pelayanan")
                    .with_children(vec![OrgNode::new("Seksi Rujukan")]),
            ]),
            OrgNode::new("Kecamatan Ajibarang"),
        ]
    }

    #[test]
    fn walk_is_pre_order_with_parent_names() {
        let mut seen = Vec::new();
        walk(&sample(), |node, parent| {
            seen.push((node.name.clone(), parent.map(str::to_string)))
        });
        let names: Vec<_> = seen.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "Dinas Kesehatan",
                "Sekretariat",
                "Bidang Pelayanan",
                "Seksi Rujukan",
                "Kecamatan Ajibarang"
            ]
        );
        assert_eq!(seen[0].1, None);
        assert_eq!(seen[3].1.as_deref(), Some("Bidang Pelayanan"));
        assert_eq!(seen[4].1, None);
    }

    #[test]
    fn flatten_concatenates_visitor_output() {
        let rows = flatten(&sample(), |node, _| {
            if node.children.is_empty() {
                vec![node.name.clone()]
            } else {
                Vec::new()
            }
        });
        assert_eq!(rows, ["Sekretariat", "Seksi Rujukan", "Kecamatan Ajibarang"]);
    }

    #[test]
    fn rebuild_sees_original_parent_name_before_parent_is_rewritten() {
        let rebuilt = rebuild(&sample(), |node, parent, children| OrgNode {
            name: node.name.to_uppercase(),
            catatan: parent.map(str::to_string),
            children,
            ..node.clone()
        });
        assert_eq!(rebuilt[0].name, "DINAS KESEHATAN");
        assert_eq!(rebuilt[0].children[0].catatan.as_deref(), Some("Dinas Kesehatan"));
        assert_eq!(
            rebuilt[0].children[1].children[0].catatan.as_deref(),
            Some("Bidang Pelayanan")
        );
        assert_eq!(count_nodes(&rebuilt), 5);
    }

    #[test]
    fn find_by_name_returns_first_pre_order_match() {
        let mut roots = sample();
        assert!(find_by_name(&roots, "Seksi Rujukan").is_some());
        assert!(find_by_name(&roots, "Dinas Pendidikan").is_none());
        let node = find_by_name_mut(&mut roots, "Sekretariat").unwrap();
        node.children.push(OrgNode::new("Subbagian Umum"));
        assert_eq!(count_nodes(&roots), 6);
    }
}
