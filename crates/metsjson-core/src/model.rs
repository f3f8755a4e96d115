//! In-memory METS package tree.
//!
//! Produced by [`crate::ingest`], read-only afterwards. Element order is
//! document order everywhere; later stages rely on it for "last match wins".

use std::collections::BTreeMap;

/// Label of the structural map the engine consults.
pub const DEFAULT_STRUCT_MAP_LABEL: &str = "Archivematica default";

/// Label of the directory holding package content; its DMDIDs are transfer-level.
pub const OBJECTS_DIRECTORY: &str = "objects";

/// `mdWrap/@MDTYPE` of Dublin Core descriptive records.
pub const MDTYPE_DUBLIN_CORE: &str = "DC";

/// `mdWrap/@MDTYPE` of PREMIS object records.
pub const MDTYPE_PREMIS_OBJECT: &str = "PREMIS:OBJECT";

/// Root of a parsed METS document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageTree {
    pub header: MetsHeader,
    /// dmdSec blocks
    pub descriptive: Vec<DescriptiveSection>,
    /// amdSec blocks
    pub administrative: Vec<AdministrativeSection>,
    /// fileSec/fileGrp blocks
    pub file_groups: Vec<FileGroup>,
    pub struct_maps: Vec<StructMap>,
}

/// metsHdr timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetsHeader {
    pub created: String,
    pub last_modified: String,
}

/// One dmdSec block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptiveSection {
    pub id: String,
    pub payload: DescriptivePayload,
    /// digiprovMD blocks embedded directly in the dmdSec.
    pub provenance: Vec<DigiprovBlock>,
}

/// Payload of a dmdSec's mdWrap, selected by its MDTYPE.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptivePayload {
    DublinCore(DublinCore),
    PremisObject(PremisObject),
    Other { md_type: String },
}

impl Default for DescriptivePayload {
    fn default() -> Self {
        Self::Other {
            md_type: String::new(),
        }
    }
}

/// Dublin Core record as found in the source.
///
/// Multi-valued elements keep every occurrence; single-valued ones keep the
/// last occurrence. DC Terms refinements land in `terms` keyed by local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DublinCore {
    pub identifier: String,
    pub title: String,
    pub creator: String,
    pub date: String,
    pub type_: String,
    pub format: String,
    pub language: Vec<String>,
    pub contributor: String,
    pub provenance: String,
    pub subject: Vec<String>,
    pub description: String,
    pub publisher: String,
    pub source: String,
    pub relation: String,
    pub coverage: String,
    pub rights: Vec<String>,
    pub terms: BTreeMap<String, String>,
}

/// One amdSec block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdministrativeSection {
    pub id: String,
    pub technical: TechnicalMd,
    pub provenance: Vec<DigiprovBlock>,
    pub source: Option<SourceMd>,
}

/// amdSec/techMD
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnicalMd {
    /// Empty when the amdSec has no techMD; such sections describe no file.
    pub id: String,
    pub object: PremisObject,
}

/// PREMIS object characteristics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PremisObject {
    pub original_name: String,
    pub identifiers: Vec<String>,
    pub fixity: Fixity,
    /// Raw `objectCharacteristics/size` text; validated by the assembler.
    pub size: String,
    pub format: FormatDesignation,
    pub registry: FormatRegistry,
    pub date_created_by_application: String,
    pub fits: FitsInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fixity {
    pub algorithm: String,
    pub digest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatDesignation {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatRegistry {
    pub name: String,
    pub key: String,
}

/// Third-party identification result embedded in objectCharacteristicsExtension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FitsInfo {
    pub md5: String,
    pub file_path: String,
    pub file_name: String,
    pub last_modified: String,
    pub identity: FitsIdentity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FitsIdentity {
    pub format: String,
    pub mimetype: String,
    pub tool_name: String,
    pub tool_version: String,
}

/// digiprovMD block. `md_type` decides whether `event` or `agent` is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigiprovBlock {
    pub id: String,
    pub md_type: String,
    pub event: PremisEvent,
    pub agent: PremisAgent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PremisEvent {
    pub identifier: String,
    pub event_type: String,
    pub date_time: String,
    pub detail: String,
    pub outcome: String,
    pub outcome_note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PremisAgent {
    pub identifier_type: String,
    pub identifier_value: String,
    pub name: String,
    pub agent_type: String,
}

/// sourceMD transfer metadata (bag-info style key/value pairs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMd {
    pub fields: BTreeMap<String, String>,
}

/// fileSec/fileGrp
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileGroup {
    pub usage: String,
    pub files: Vec<FileRef>,
}

/// fileGrp/file with its FLocat href.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRef {
    pub id: String,
    pub adm_id: String,
    pub href: String,
}

/// A structMap and its root div.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructMap {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub root: Option<StructNode>,
}

/// A structMap div.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructNode {
    Directory {
        label: String,
        dmd_ids: Vec<String>,
        adm_ids: Vec<String>,
        children: Vec<StructNode>,
    },
    Item {
        label: String,
        file_id: String,
        dmd_ids: Vec<String>,
        adm_ids: Vec<String>,
    },
}

impl StructNode {
    pub fn label(&self) -> &str {
        match self {
            Self::Directory { label, .. } | Self::Item { label, .. } => label,
        }
    }

    pub fn dmd_ids(&self) -> &[String] {
        match self {
            Self::Directory { dmd_ids, .. } | Self::Item { dmd_ids, .. } => dmd_ids,
        }
    }
}

impl StructMap {
    pub fn is_default(&self) -> bool {
        self.label == DEFAULT_STRUCT_MAP_LABEL
    }
}
