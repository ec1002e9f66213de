//! Rebuilds a hierarchy from flat relations.
//!
//! Text format (one chain per line, child first):
//!   `Subbagian Umum - Sekretariat - Dinas Pendidikan`
//!
//! Blank lines are ignored. Tokens are whitespace-normalized; every adjacent
//! pair is a (child, parent) edge. Roots are names that never appear as a child.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::OrgNode;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    pub all_nodes: BTreeSet<String>,
    pub children_set: BTreeSet<String>,
    pub parent_to_children: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Relation {
    pub parent: String,
    pub child: String,
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"\s*-\s*").expect("separator pattern is valid"))
}

pub fn normalize(token: &str) -> String {
    token.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn parse_lines(text: &str) -> EdgeSet {
    let mut edges = EdgeSet::default();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<String> = separator()
            .split(line)
            .map(normalize)
            .filter(|part| !part.is_empty())
            .collect();
        for part in &parts {
            edges.all_nodes.insert(part.clone());
        }
        for pair in parts.windows(2) {
            edges.add_edge(&pair[0], &pair[1]);
        }
    }
    debug!(
        nodes = edges.all_nodes.len(),
        parents = edges.parent_to_children.len(),
        "parsed hierarchy lines"
    );
    edges
}

impl EdgeSet {
    /// Builds from `(child, parent)` pairs such as the rows of a flattened export.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut edges = Self::default();
        for (child, parent) in pairs {
            edges.all_nodes.insert(child.to_string());
            if let Some(parent) = parent {
                edges.all_nodes.insert(parent.to_string());
                edges.add_edge(child, parent);
            }
        }
        edges
    }

    fn add_edge(&mut self, child: &str, parent: &str) {
        self.parent_to_children
            .entry(parent.to_string())
            .or_default()
            .insert(child.to_string());
        self.children_set.insert(child.to_string());
    }

    pub fn roots(&self) -> Vec<String> {
        self.all_nodes
            .difference(&self.children_set)
            .cloned()
            .collect()
    }

    pub fn relations(&self) -> Vec<Relation> {
        self.parent_to_children
            .iter()
            .flat_map(|(parent, children)| {
                children.iter().map(move |child| Relation {
                    parent: parent.clone(),
                    child: child.clone(),
                })
            })
            .collect()
    }

    /// Returns the first cycle found, as a path that starts and ends on the same name.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Active,
            Done,
        }

        fn visit<'a>(
            edges: &'a EdgeSet,
            name: &'a str,
            marks: &mut BTreeMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            match marks.get(name) {
                Some(Mark::Done) => return None,
                Some(Mark::Active) => {
                    let start = path.iter().position(|p| *p == name).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|p| p.to_string()).collect();
                    cycle.push(name.to_string());
                    return Some(cycle);
                }
                None => {}
            }
            marks.insert(name, Mark::Active);
            path.push(name);
            if let Some(children) = edges.parent_to_children.get(name) {
                for child in children {
                    if let Some(cycle) = visit(edges, child, marks, path) {
                        return Some(cycle);
                    }
                }
            }
            path.pop();
            marks.insert(name, Mark::Done);
            None
        }

        let mut marks = BTreeMap::new();
        for name in &self.all_nodes {
            let mut path = Vec::new();
            if let Some(cycle) = visit(self, name, &mut marks, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    /// Reconstructs the tree with children in lexicographic order.
    /// A name with several parents is expanded under each of them.
    pub fn build_tree(&self) -> Result<Vec<OrgNode>> {
        if let Some(path) = self.find_cycle() {
            return Err(Error::Cycle { path });
        }
        Ok(self
            .roots()
            .iter()
            .map(|root| self.subtree(root))
            .collect())
    }

    fn subtree(&self, name: &str) -> OrgNode {
        let children = self
            .parent_to_children
            .get(name)
            .map(|children| children.iter().map(|child| self.subtree(child)).collect())
            .unwrap_or_default();
        OrgNode::new(name).with_children(children)
    }
}
