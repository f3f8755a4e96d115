//! File location resolver: joins fileSec entries with the walked structMap.

use crate::model::FileGroup;
use crate::structmap::StructureIndex;
use std::collections::{BTreeMap, HashMap};

/// A file that is both declared in the structMap and located in the fileSec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub file_id: String,
    pub adm_id: String,
    /// DMDIDs inherited from the structMap Item.
    pub dmd_ids: Vec<String>,
    pub path: String,
}

/// File locations keyed by file ID, with a secondary ADMID index.
#[derive(Debug, Clone, Default)]
pub struct FileLocations {
    by_file: BTreeMap<String, FileLocation>,
    by_adm: HashMap<String, String>,
}

impl FileLocations {
    pub fn get(&self, file_id: &str) -> Option<&FileLocation> {
        self.by_file.get(file_id)
    }

    /// Location whose ADMID equals `adm_id`. When several files share an
    /// ADMID the one declared last in the fileSec wins.
    pub fn for_adm_id(&self, adm_id: &str) -> Option<&FileLocation> {
        self.by_adm.get(adm_id).and_then(|f| self.by_file.get(f))
    }

    pub fn len(&self) -> usize {
        self.by_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileLocation> {
        self.by_file.values()
    }
}

/// Resolve every fileSec entry that the structMap declares.
///
/// Entries absent from the structMap (auxiliary files, metadata files) are
/// dropped without error.
pub fn resolve(groups: &[FileGroup], structure: &StructureIndex) -> FileLocations {
    let mut locations = FileLocations::default();
    let mut dropped = 0usize;

    for file in groups.iter().flat_map(|g| g.files.iter()) {
        let Some(dmd_ids) = structure.dmd_ids_for(&file.id) else {
            dropped += 1;
            continue;
        };
        let location = FileLocation {
            file_id: file.id.clone(),
            adm_id: file.adm_id.clone(),
            dmd_ids: dmd_ids.to_vec(),
            path: file.href.clone(),
        };
        if let Some(previous) = locations.by_file.insert(file.id.clone(), location) {
            if locations.by_adm.get(&previous.adm_id) == Some(&previous.file_id) {
                locations.by_adm.remove(&previous.adm_id);
            }
        }
        if !file.adm_id.is_empty() {
            locations
                .by_adm
                .insert(file.adm_id.clone(), file.id.clone());
        }
    }

    tracing::debug!(
        resolved = locations.len(),
        dropped,
        "resolved fileSec locations"
    );
    locations
}
