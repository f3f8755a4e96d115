//! Output record layouts.
//!
//! One engine, two layouts: the assembler produces a [`Manifest`] and
//! [`render`] lays it out for the selected [`SchemaVariant`].

use crate::assemble::{Manifest, ManifestEntry};
use crate::error::MetsError;
use crate::model::DublinCore;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// DC Terms refinements carried through to the descriptive block.
pub const DC_TERMS: &[&str] = &[
    "abstract",
    "accessRights",
    "accrualMethod",
    "accrualPeriodicity",
    "accrualPolicy",
    "alternative",
    "audience",
    "available",
    "bibliographicCitation",
    "conformsTo",
    "created",
    "dateAccepted",
    "dateCopyrighted",
    "dateSubmitted",
    "educationLevel",
    "extent",
    "hasFormat",
    "hasPart",
    "hasVersion",
    "instructionalMethod",
    "isFormatOf",
    "isPartOf",
    "isReferencedBy",
    "isReplacedBy",
    "isRequiredBy",
    "issued",
    "isVersionOf",
    "license",
    "mediator",
    "modified",
    "references",
    "replaces",
    "requires",
    "rightsHolder",
    "spatial",
    "tableOfContents",
    "temporal",
    "valid",
];

/// Separator for multi-valued DC elements.
pub const MULTI_VALUE_SEPARATOR: &str = ",";

/// Output layout selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaVariant {
    /// Files under `manifest`, each with a `descriptiveMD` block.
    #[default]
    Mets,
    /// Files under `tar_techMD`, technical fields only.
    Legacy,
}

impl SchemaVariant {
    pub fn schema_version(self) -> &'static str {
        match self {
            Self::Mets => "0.2.0",
            Self::Legacy => "0.1.0",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mets => "mets",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = MetsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mets" | "0.2.0" => Ok(Self::Mets),
            "legacy" | "0.1.0" => Ok(Self::Legacy),
            other => Err(MetsError::usage(format!(
                "unknown schema variant '{other}' (expected 'mets' or 'legacy')"
            ))),
        }
    }
}

// =============================================================================
// Shared records
// =============================================================================

/// PREMIS event as emitted.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct EventRecord {
    pub uuid: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub datetime: String,
    pub outcome: String,
    pub detail: String,
    pub detail_note: String,
}

/// PREMIS agent as emitted.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AgentRecord {
    pub identifier_type: String,
    pub identifier_value: String,
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: String,
}

/// Format identification match.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FormatMatch {
    pub ns: String,
    pub id: String,
    pub format: String,
    pub version: String,
    pub mime: String,
    pub basis: String,
    pub warning: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub details: String,
}

/// Per-file descriptive block: Dublin Core fields plus provenance.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DescriptiveBlock {
    pub identifier: String,
    pub title: String,
    pub creator: String,
    pub date: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub format: String,
    pub language: String,
    pub contributor: String,
    pub provenance: String,
    pub subject: String,
    pub description: String,
    pub publisher: String,
    pub source: String,
    pub relation: String,
    pub coverage: String,
    pub rights: String,
    #[serde(flatten)]
    pub terms: BTreeMap<String, String>,
    pub events: Vec<EventRecord>,
    pub agents: Vec<AgentRecord>,
}

impl DescriptiveBlock {
    /// Block with provenance only, used when no Dublin Core record matches.
    pub fn provenance_only(events: Vec<EventRecord>, agents: Vec<AgentRecord>) -> Self {
        Self {
            events,
            agents,
            ..Default::default()
        }
    }

    /// Dublin Core fields of `dc` with the given provenance.
    pub fn from_dublin_core(
        dc: &DublinCore,
        events: Vec<EventRecord>,
        agents: Vec<AgentRecord>,
    ) -> Self {
        let terms = dc
            .terms
            .iter()
            .filter(|(k, v)| !v.is_empty() && DC_TERMS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            identifier: dc.identifier.clone(),
            title: dc.title.clone(),
            creator: dc.creator.clone(),
            date: dc.date.clone(),
            type_: dc.type_.clone(),
            format: dc.format.clone(),
            language: dc.language.join(MULTI_VALUE_SEPARATOR),
            contributor: dc.contributor.clone(),
            provenance: dc.provenance.clone(),
            subject: dc.subject.join(MULTI_VALUE_SEPARATOR),
            description: dc.description.clone(),
            publisher: dc.publisher.clone(),
            source: dc.source.clone(),
            relation: dc.relation.clone(),
            coverage: dc.coverage.clone(),
            rights: dc.rights.join(MULTI_VALUE_SEPARATOR),
            terms,
            events,
            agents,
        }
    }
}

// =============================================================================
// Document layouts
// =============================================================================

/// Scan/tooling block with the file list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TechBlock<F> {
    pub siegfried: String,
    pub scandate: String,
    pub signature: String,
    pub created: String,
    pub identifiers: Vec<Identifier>,
    pub files: Vec<F>,
}

/// File record of the legacy layout.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegacyFile {
    pub filename: String,
    pub filesize: u64,
    pub modified: String,
    pub errors: String,
    pub md5: String,
    pub sha256: String,
    pub matches: Vec<FormatMatch>,
}

/// File record of the METS layout.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetsFile {
    #[serde(flatten)]
    pub file: LegacyFile,
    #[serde(rename = "descriptiveMD")]
    pub descriptive: DescriptiveBlock,
}

/// Package-level fields preceding the technical block.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PackageHead {
    pub title: String,
    pub jira_ticket_number: String,
    pub department_or_library: String,
    pub collection_call: String,
    pub depositor_name: String,
    pub bagging_date: String,
    pub description: String,
    pub sf_errors: String,
}

/// Package-level fields following the technical block.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PackageTail {
    pub manifest_sha256: String,
    pub manifest_md5: String,
    pub storage_location: String,
    pub file_count: u64,
    pub schema_version: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetsDocument {
    #[serde(flatten)]
    pub head: PackageHead,
    pub manifest: TechBlock<MetsFile>,
    #[serde(flatten)]
    pub tail: PackageTail,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegacyDocument {
    #[serde(flatten)]
    pub head: PackageHead,
    #[serde(rename = "tar_techMD")]
    pub tar_tech_md: TechBlock<LegacyFile>,
    #[serde(flatten)]
    pub tail: PackageTail,
}

/// A rendered manifest, ready for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ManifestDocument {
    Mets(MetsDocument),
    Legacy(LegacyDocument),
}

impl ManifestDocument {
    pub fn storage_location(&self) -> &str {
        &self.tail().storage_location
    }

    pub fn file_count(&self) -> u64 {
        self.tail().file_count
    }

    fn tail(&self) -> &PackageTail {
        match self {
            Self::Mets(d) => &d.tail,
            Self::Legacy(d) => &d.tail,
        }
    }
}

/// Lay out `manifest` for `variant`.
pub fn render(manifest: &Manifest, variant: SchemaVariant) -> ManifestDocument {
    let head = PackageHead {
        title: manifest.title.clone(),
        collection_call: manifest.collection_call.clone(),
        bagging_date: manifest.bagging_date.clone(),
        description: manifest.description.clone(),
        ..Default::default()
    };
    let tail = PackageTail {
        manifest_sha256: manifest.source_digests.sha256.clone(),
        manifest_md5: manifest.source_digests.md5.clone(),
        storage_location: manifest.package_name.clone(),
        file_count: manifest.file_count,
        schema_version: variant.schema_version().to_string(),
    };

    match variant {
        SchemaVariant::Mets => ManifestDocument::Mets(MetsDocument {
            head,
            manifest: tech_block(manifest, |e| MetsFile {
                file: legacy_file(e),
                descriptive: e.descriptive.clone(),
            }),
            tail,
        }),
        SchemaVariant::Legacy => ManifestDocument::Legacy(LegacyDocument {
            head,
            tar_tech_md: tech_block(manifest, legacy_file),
            tail,
        }),
    }
}

fn tech_block<F>(manifest: &Manifest, file: impl Fn(&ManifestEntry) -> F) -> TechBlock<F> {
    let (siegfried, scandate, identifiers) = match &manifest.scan {
        Some(scan) => (
            scan.version.clone(),
            scan.scan_date.clone(),
            vec![Identifier {
                name: scan.program.clone(),
                details: scan.version.clone(),
            }],
        ),
        None => Default::default(),
    };
    TechBlock {
        siegfried,
        scandate,
        signature: String::new(),
        created: String::new(),
        identifiers,
        files: manifest.files.iter().map(file).collect(),
    }
}

fn legacy_file(entry: &ManifestEntry) -> LegacyFile {
    LegacyFile {
        filename: entry.filename.clone(),
        filesize: entry.filesize,
        modified: entry.modified.clone(),
        errors: String::new(),
        md5: entry.md5.clone(),
        sha256: entry.sha256.clone(),
        matches: entry.matches.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_names_and_versions() {
        assert_eq!("mets".parse::<SchemaVariant>().unwrap(), SchemaVariant::Mets);
        assert_eq!(" Legacy ".parse::<SchemaVariant>().unwrap(), SchemaVariant::Legacy);
        assert_eq!("0.1.0".parse::<SchemaVariant>().unwrap(), SchemaVariant::Legacy);
        let err = "canopus".parse::<SchemaVariant>().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn descriptive_block_joins_multi_values_and_filters_terms() {
        let mut dc = DublinCore {
            title: "Diary".into(),
            language: vec!["en".into(), "fr".into()],
            subject: vec!["travel".into()],
            ..Default::default()
        };
        dc.terms.insert("isPartOf".into(), "Fonds 7".into());
        dc.terms.insert("extent".into(), String::new());
        dc.terms.insert("madeUp".into(), "x".into());

        let block = DescriptiveBlock::from_dublin_core(&dc, vec![], vec![]);
        assert_eq!(block.language, "en,fr");
        assert_eq!(block.subject, "travel");
        assert_eq!(block.terms.len(), 1);

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["isPartOf"], "Fonds 7");
        assert!(json.get("extent").is_none());
        assert!(json.get("madeUp").is_none());
        assert_eq!(json["type"], "");
        assert!(json["events"].as_array().unwrap().is_empty());
    }

    #[test]
    fn event_record_uses_output_keys() {
        let event = EventRecord {
            uuid: "e-1".into(),
            event_type: "ingestion".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ingestion");
        assert!(json.get("detail_note").is_some());
    }
}
