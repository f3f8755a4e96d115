//! Structural map walker.
//!
//! Recovers, from the "Archivematica default" structMap, the descriptive IDs
//! attached to every file and to the `objects` directory, plus the package
//! name (label of the root directory).

use crate::error::{MetsError, MetsResult};
use crate::model::{StructMap, StructNode, OBJECTS_DIRECTORY};
use std::collections::BTreeMap;

/// Nesting limit for structMap divs.
pub const MAX_STRUCTURE_DEPTH: usize = 256;

/// Walker output. File IDs and transfer-level IDs are kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureIndex {
    /// Label of the root directory; empty when there is none.
    pub package_name: String,
    /// File ID → DMDIDs of its Item div, in attribute order.
    pub files: BTreeMap<String, Vec<String>>,
    /// DMDIDs of the `objects` directory. `None` when no such directory exists.
    pub transfer_dmd_ids: Option<Vec<String>>,
}

impl StructureIndex {
    pub fn dmd_ids_for(&self, file_id: &str) -> Option<&[String]> {
        self.files.get(file_id).map(Vec::as_slice)
    }

    pub fn transfer_dmd_ids(&self) -> &[String] {
        self.transfer_dmd_ids.as_deref().unwrap_or_default()
    }
}

/// Walk every structMap labelled "Archivematica default", in document order.
pub fn walk(struct_maps: &[StructMap]) -> MetsResult<StructureIndex> {
    let mut index = StructureIndex::default();
    let mut found = false;

    for map in struct_maps.iter().filter(|m| m.is_default()) {
        found = true;
        if let Some(root) = &map.root {
            visit(root, 0, &mut index)?;
        }
    }
    index.package_name = package_name(struct_maps);

    if !found {
        tracing::warn!("no \"Archivematica default\" structMap; package name and transfer metadata will be empty");
    } else if index.transfer_dmd_ids.is_none() {
        tracing::warn!("structMap has no \"objects\" directory; no transfer-level metadata");
    }
    tracing::debug!(
        files = index.files.len(),
        package = %index.package_name,
        "walked structMap"
    );
    Ok(index)
}

/// Label of the default structMap's root div when it is a directory.
/// The last matching structMap wins.
pub fn package_name(struct_maps: &[StructMap]) -> String {
    struct_maps
        .iter()
        .rev()
        .filter(|m| m.is_default())
        .find_map(|m| match &m.root {
            Some(StructNode::Directory { label, .. }) => Some(label.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn visit(node: &StructNode, depth: usize, index: &mut StructureIndex) -> MetsResult<()> {
    if depth >= MAX_STRUCTURE_DEPTH {
        return Err(MetsError::StructureTooDeep {
            limit: MAX_STRUCTURE_DEPTH,
        });
    }
    match node {
        StructNode::Item {
            file_id, dmd_ids, ..
        } => {
            index.files.insert(file_id.clone(), dmd_ids.clone());
        }
        StructNode::Directory {
            label,
            dmd_ids,
            children,
            ..
        } => {
            if label == OBJECTS_DIRECTORY {
                index.transfer_dmd_ids = Some(dmd_ids.clone());
            }
            for child in children {
                visit(child, depth + 1, index)?;
            }
        }
    }
    Ok(())
}
