//! Descriptive metadata index: Dublin Core dmdSec records by ID.

use crate::model::{DescriptivePayload, DescriptiveSection, DublinCore};
use std::collections::HashMap;

/// Dublin Core records keyed by dmdSec ID. Non-DC dmdSecs are not indexed.
#[derive(Debug, Clone, Default)]
pub struct DescriptiveIndex<'a> {
    records: HashMap<&'a str, &'a DublinCore>,
}

impl<'a> DescriptiveIndex<'a> {
    pub fn build(sections: &'a [DescriptiveSection]) -> Self {
        let records: HashMap<_, _> = sections
            .iter()
            .filter_map(|s| match &s.payload {
                DescriptivePayload::DublinCore(dc) => Some((s.id.as_str(), dc)),
                _ => None,
            })
            .collect();
        tracing::debug!(
            dublin_core = records.len(),
            dmd_secs = sections.len(),
            "indexed descriptive metadata"
        );
        Self { records }
    }

    pub fn get(&self, dmd_id: &str) -> Option<&'a DublinCore> {
        self.records.get(dmd_id).copied()
    }

    /// The record of the last ID in `ids` that is indexed.
    pub fn last_match<S: AsRef<str>>(&self, ids: &[S]) -> Option<&'a DublinCore> {
        ids.iter().rev().find_map(|id| self.get(id.as_ref()))
    }

    /// Transfer-level record: last indexed ID among the `objects` DMDIDs.
    pub fn transfer_record<S: AsRef<str>>(&self, objects_dmd_ids: &[S]) -> Option<&'a DublinCore> {
        self.last_match(objects_dmd_ids)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PremisObject;

    fn dc_section(id: &str, title: &str) -> DescriptiveSection {
        DescriptiveSection {
            id: id.into(),
            payload: DescriptivePayload::DublinCore(DublinCore {
                title: title.into(),
                ..Default::default()
            }),
            provenance: vec![],
        }
    }

    #[test]
    fn only_dublin_core_is_indexed() {
        let sections = vec![
            dc_section("dmdSec_1", "Transfer"),
            DescriptiveSection {
                id: "dmdSec_2".into(),
                payload: DescriptivePayload::PremisObject(PremisObject::default()),
                provenance: vec![],
            },
        ];
        let index = DescriptiveIndex::build(&sections);
        assert_eq!(index.len(), 1);
        assert!(index.get("dmdSec_2").is_none());
    }

    #[test]
    fn last_listed_id_wins() {
        let sections = vec![dc_section("D2", "second"), dc_section("D1", "first")];
        let index = DescriptiveIndex::build(&sections);
        assert_eq!(index.last_match(&["D1", "D2"]).unwrap().title, "second");
        assert_eq!(index.last_match(&["D2", "D1"]).unwrap().title, "first");
        assert_eq!(index.last_match(&["D1", "missing"]).unwrap().title, "first");
        assert!(index.last_match::<&str>(&[]).is_none());
    }

    #[test]
    fn transfer_record_uses_objects_ids() {
        let sections = vec![dc_section("dmdSec_1", "Fonds")];
        let index = DescriptiveIndex::build(&sections);
        let ids = vec!["dmdSec_1".to_string()];
        assert_eq!(index.transfer_record(&ids).unwrap().title, "Fonds");
    }
}
