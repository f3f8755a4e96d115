//! Manifest assembler.
//!
//! Drives the walker, resolver, indices and provenance extractor, then
//! merges their outputs into one [`ManifestEntry`] per described file.

use crate::descriptive::DescriptiveIndex;
use crate::digest::SourceDigests;
use crate::error::{MetsError, MetsResult};
use crate::filesec::{self, FileLocations};
use crate::model::{AdministrativeSection, PackageTree, PremisObject};
use crate::provenance::{self, Provenance, ToolScan};
use crate::schema::{AgentRecord, DescriptiveBlock, EventRecord, FormatMatch};
use crate::structmap;

/// Fixity algorithm tag that populates the SHA-256 field. Case-sensitive.
pub const SHA256_ALGORITHM: &str = "sha256";

/// Fixity algorithm tag accepted as an MD5 source.
pub const MD5_ALGORITHM: &str = "md5";

#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    pub source_digests: SourceDigests,
}

/// Package manifest, independent of output layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub title: String,
    pub collection_call: String,
    pub description: String,
    pub bagging_date: String,
    /// Root directory label of the structMap; also the storage location.
    pub package_name: String,
    pub files: Vec<ManifestEntry>,
    pub file_count: u64,
    pub total_bytes: u64,
    pub scan: Option<ToolScan>,
    pub source_digests: SourceDigests,
}

/// One described file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestEntry {
    /// amdSec the entry was built from.
    pub adm_id: String,
    pub filename: String,
    pub filesize: u64,
    pub modified: String,
    pub md5: String,
    pub sha256: String,
    pub matches: Vec<FormatMatch>,
    pub descriptive: DescriptiveBlock,
}

/// Build the manifest for `tree`.
///
/// Fails before any extraction when the package has no dmdSec at all.
pub fn assemble(tree: &PackageTree, opts: &AssembleOptions) -> MetsResult<Manifest> {
    if tree.descriptive.is_empty() {
        return Err(MetsError::MissingDescriptiveMetadata);
    }

    let structure = structmap::walk(&tree.struct_maps)?;
    let locations = filesec::resolve(&tree.file_groups, &structure);
    let index = DescriptiveIndex::build(&tree.descriptive);

    let mut files = Vec::new();
    for section in &tree.administrative {
        if let Some(entry) = build_entry(section, &locations, &index)? {
            files.push(entry);
        }
    }
    let file_count = files.len() as u64;
    let total_bytes = files
        .iter()
        .try_fold(0u64, |acc, f| acc.checked_add(f.filesize))
        .ok_or(MetsError::TotalSizeOverflow)?;

    let transfer = index.transfer_record(structure.transfer_dmd_ids());
    let mut title = transfer.map(|dc| dc.title.clone()).unwrap_or_default();
    if title.is_empty() {
        title = structure.package_name.clone();
    }
    if title.is_empty() {
        tracing::warn!("package has neither a transfer-level title nor a package name");
    }

    Ok(Manifest {
        title,
        collection_call: transfer.map(|dc| dc.identifier.clone()).unwrap_or_default(),
        description: transfer
            .map(|dc| dc.description.clone())
            .unwrap_or_default(),
        bagging_date: tree.header.created.clone(),
        package_name: structure.package_name,
        files,
        file_count,
        total_bytes,
        scan: provenance::scan_metadata(&tree.administrative)?,
        source_digests: opts.source_digests.clone(),
    })
}

/// Entry for one amdSec, or `None` when it carries no techMD.
pub fn build_entry(
    section: &AdministrativeSection,
    locations: &FileLocations,
    index: &DescriptiveIndex<'_>,
) -> MetsResult<Option<ManifestEntry>> {
    if section.technical.id.is_empty() {
        return Ok(None);
    }
    let object = &section.technical.object;
    let filesize = parse_size(section)?;
    let (md5, sha256) = checksums(object);
    let Provenance { events, agents } = provenance::extract(&section.provenance);

    let (filename, descriptive) = match locations.for_adm_id(&section.id) {
        Some(location) => (
            location.path.clone(),
            merge_descriptive(events, agents, &location.dmd_ids, index),
        ),
        None => {
            tracing::debug!(adm_id = %section.id, "amdSec has no located file");
            (
                String::new(),
                DescriptiveBlock::provenance_only(events, agents),
            )
        }
    };

    Ok(Some(ManifestEntry {
        adm_id: section.id.clone(),
        filename,
        filesize,
        modified: object.date_created_by_application.clone(),
        md5,
        sha256,
        matches: vec![format_match(object)],
        descriptive,
    }))
}

/// Descriptive block for a file with DMDIDs `dmd_ids`.
///
/// IDs are applied in list order and each hit replaces the previous one, so
/// the last indexed ID supplies the Dublin Core fields. Provenance always
/// comes from the file's own amdSec.
pub fn merge_descriptive(
    events: Vec<EventRecord>,
    agents: Vec<AgentRecord>,
    dmd_ids: &[String],
    index: &DescriptiveIndex<'_>,
) -> DescriptiveBlock {
    match index.last_match(dmd_ids) {
        Some(dc) => DescriptiveBlock::from_dublin_core(dc, events, agents),
        None => DescriptiveBlock::provenance_only(events, agents),
    }
}

fn parse_size(section: &AdministrativeSection) -> MetsResult<u64> {
    let raw = section.technical.object.size.trim();
    if raw.is_empty() {
        return Err(MetsError::MissingSize {
            adm_id: section.id.clone(),
        });
    }
    raw.parse::<u64>().map_err(|source| MetsError::InvalidSize {
        adm_id: section.id.clone(),
        value: raw.to_string(),
        source,
    })
}

/// (md5, sha256). MD5 prefers the identification tool's checksum and falls
/// back to an MD5 fixity.
fn checksums(object: &PremisObject) -> (String, String) {
    let md5 = if !object.fits.md5.is_empty() {
        object.fits.md5.clone()
    } else if object.fixity.algorithm == MD5_ALGORITHM {
        object.fixity.digest.clone()
    } else {
        String::new()
    };
    let sha256 = if object.fixity.algorithm == SHA256_ALGORITHM {
        object.fixity.digest.clone()
    } else {
        String::new()
    };
    (md5, sha256)
}

fn format_match(object: &PremisObject) -> FormatMatch {
    FormatMatch {
        ns: object.registry.name.clone(),
        id: object.registry.key.clone(),
        format: object.format.name.clone(),
        version: object.format.version.clone(),
        mime: object.fits.identity.mimetype.clone(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DescriptivePayload, DescriptiveSection, DublinCore, FileGroup, FileRef, Fixity,
        StructMap, StructNode, TechnicalMd, DEFAULT_STRUCT_MAP_LABEL,
    };

    fn dc(id: &str, title: &str) -> DescriptiveSection {
        DescriptiveSection {
            id: id.into(),
            payload: DescriptivePayload::DublinCore(DublinCore {
                title: title.into(),
                identifier: format!("{id}-ident"),
                ..Default::default()
            }),
            provenance: vec![],
        }
    }

    fn amd(id: &str, size: &str, algorithm: &str, digest: &str) -> AdministrativeSection {
        AdministrativeSection {
            id: id.into(),
            technical: TechnicalMd {
                id: format!("techMD_{id}"),
                object: PremisObject {
                    size: size.into(),
                    fixity: Fixity {
                        algorithm: algorithm.into(),
                        digest: digest.into(),
                    },
                    ..Default::default()
                },
            },
            ..Default::default()
        }
    }

    fn tree(
        objects_dmd: &[&str],
        item_dmd: &[&str],
        descriptive: Vec<DescriptiveSection>,
        administrative: Vec<AdministrativeSection>,
    ) -> PackageTree {
        let strs = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        PackageTree {
            descriptive,
            administrative,
            file_groups: vec![FileGroup {
                usage: "original".into(),
                files: vec![FileRef {
                    id: "file-1".into(),
                    adm_id: "amdSec_1".into(),
                    href: "objects/a.tif".into(),
                }],
            }],
            struct_maps: vec![StructMap {
                label: DEFAULT_STRUCT_MAP_LABEL.into(),
                root: Some(StructNode::Directory {
                    label: "pkg".into(),
                    dmd_ids: vec![],
                    adm_ids: vec![],
                    children: vec![StructNode::Directory {
                        label: "objects".into(),
                        dmd_ids: strs(objects_dmd),
                        adm_ids: vec![],
                        children: vec![StructNode::Item {
                            label: "a.tif".into(),
                            file_id: "file-1".into(),
                            dmd_ids: strs(item_dmd),
                            adm_ids: vec![],
                        }],
                    }],
                }),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn last_descriptive_match_wins() {
        let t = tree(
            &[],
            &["D1", "D2"],
            vec![dc("D1", "first"), dc("D2", "second")],
            vec![amd("amdSec_1", "10", "md5", "aa")],
        );
        let m = assemble(&t, &AssembleOptions::default()).unwrap();
        assert_eq!(m.files[0].descriptive.title, "second");
        assert_eq!(m.files[0].filename, "objects/a.tif");
    }

    #[test]
    fn title_falls_back_to_package_name() {
        let t = tree(
            &["missing"],
            &[],
            vec![dc("D1", "unused")],
            vec![amd("amdSec_1", "10", "md5", "aa")],
        );
        let m = assemble(&t, &AssembleOptions::default()).unwrap();
        assert_eq!(m.title, "pkg");
        assert_eq!(m.collection_call, "");
        assert_eq!(m.package_name, "pkg");
    }

    #[test]
    fn transfer_record_supplies_package_fields() {
        let t = tree(
            &["D1"],
            &[],
            vec![dc("D1", "Fonds")],
            vec![amd("amdSec_1", "10", "md5", "aa")],
        );
        let m = assemble(&t, &AssembleOptions::default()).unwrap();
        assert_eq!(m.title, "Fonds");
        assert_eq!(m.collection_call, "D1-ident");
    }

    #[test]
    fn sections_without_tech_md_are_skipped() {
        let mut bare = amd("amdSec_2", "", "", "");
        bare.technical.id.clear();
        let t = tree(
            &[],
            &[],
            vec![dc("D1", "x")],
            vec![amd("amdSec_1", "2048", "sha256", "ff"), bare],
        );
        let m = assemble(&t, &AssembleOptions::default()).unwrap();
        assert_eq!(m.file_count, 1);
        assert_eq!(m.total_bytes, 2048);
        assert_eq!(m.files[0].sha256, "ff");
        assert_eq!(m.files[0].md5, "");
    }

    #[test]
    fn sha256_tag_is_case_sensitive() {
        let (_, sha) = checksums(&amd("a", "1", "SHA256", "ff").technical.object);
        assert_eq!(sha, "");
        let (_, sha) = checksums(&amd("a", "1", "sha256", "ff").technical.object);
        assert_eq!(sha, "ff");
    }

    #[test]
    fn md5_prefers_identification_checksum() {
        let mut section = amd("a", "1", "md5", "fixity-md5");
        assert_eq!(checksums(&section.technical.object).0, "fixity-md5");
        section.technical.object.fits.md5 = "fits-md5".into();
        assert_eq!(checksums(&section.technical.object).0, "fits-md5");
    }

    #[test]
    fn empty_or_bad_size_is_fatal() {
        let t = tree(&[], &[], vec![dc("D1", "x")], vec![amd("amdSec_1", "", "md5", "a")]);
        assert!(matches!(
            assemble(&t, &AssembleOptions::default()),
            Err(MetsError::MissingSize { .. })
        ));
        let t = tree(&[], &[], vec![dc("D1", "x")], vec![amd("amdSec_1", "-4", "md5", "a")]);
        assert!(matches!(
            assemble(&t, &AssembleOptions::default()),
            Err(MetsError::InvalidSize { .. })
        ));
    }

    #[test]
    fn size_total_overflow_is_an_error() {
        let max = u64::MAX.to_string();
        let t = tree(
            &[],
            &[],
            vec![dc("D1", "x")],
            vec![
                amd("amdSec_1", &max, "md5", "a"),
                amd("amdSec_2", &max, "md5", "b"),
            ],
        );
        assert!(matches!(
            assemble(&t, &AssembleOptions::default()),
            Err(MetsError::TotalSizeOverflow)
        ));

        let t = tree(&[], &[], vec![dc("D1", "x")], vec![amd("amdSec_1", &max, "md5", "a")]);
        let m = assemble(&t, &AssembleOptions::default()).unwrap();
        assert_eq!(m.total_bytes, u64::MAX);
    }

    #[test]
    fn missing_dmd_sec_fails_first() {
        let t = tree(&[], &[], vec![], vec![amd("amdSec_1", "", "md5", "a")]);
        assert!(matches!(
            assemble(&t, &AssembleOptions::default()),
            Err(MetsError::MissingDescriptiveMetadata)
        ));
    }
}
