//! Organizational hierarchy: node model, traversal, passes, and rebuilding
//! from flat relations.

pub mod builder;
mod io;
mod node;
mod passes;
mod walk;

pub use builder::{parse_lines, EdgeSet, Relation};
pub use io::{
    backup_path, load_hierarchy, read_json, save_hierarchy, write_backup, write_json, BackupStyle,
};
pub use node::{Echelon, OrgNode, Tier};
pub use passes::{annotate_titles, is_unranked_unit, strip_school_eselon};
pub use walk::{count_nodes, find_by_name, find_by_name_mut, flatten, rebuild, walk};
