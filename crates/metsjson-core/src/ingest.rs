//! METS XML → [`PackageTree`].
//!
//! Elements are matched by local name so any namespace prefix works. Text
//! content is trimmed; absent elements and attributes become empty strings.

use crate::error::{MetsError, MetsResult};
use crate::model::{
    AdministrativeSection, DescriptivePayload, DescriptiveSection, DigiprovBlock, DublinCore,
    FileGroup, FileRef, FitsIdentity, FitsInfo, Fixity, FormatDesignation, FormatRegistry,
    MetsHeader, PackageTree, PremisAgent, PremisEvent, PremisObject, SourceMd, StructMap,
    StructNode, TechnicalMd, MDTYPE_DUBLIN_CORE, MDTYPE_PREMIS_OBJECT,
};
use crate::structmap::MAX_STRUCTURE_DEPTH;
use roxmltree::{Document, Node, ParsingOptions};

type XmlNode<'a, 'input> = Node<'a, 'input>;

/// Parse a METS document.
pub fn parse_package(xml: &str) -> MetsResult<PackageTree> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, opts)?;
    let root = doc.root_element();
    if root.tag_name().name() != "mets" {
        return Err(MetsError::NotMets {
            root: root.tag_name().name().to_string(),
        });
    }

    let mut tree = PackageTree::default();
    for node in root.children().filter(Node::is_element) {
        match node.tag_name().name() {
            "metsHdr" => {
                tree.header = MetsHeader {
                    created: attr(node, "CREATEDATE"),
                    last_modified: attr(node, "LASTMODDATE"),
                }
            }
            "dmdSec" => tree.descriptive.push(parse_dmd_sec(node)),
            "amdSec" => tree.administrative.push(parse_amd_sec(node)),
            "fileSec" => tree
                .file_groups
                .extend(elements(node, "fileGrp").map(parse_file_group)),
            "structMap" => tree.struct_maps.push(parse_struct_map(node)?),
            _ => {}
        }
    }

    tracing::debug!(
        dmd_secs = tree.descriptive.len(),
        amd_secs = tree.administrative.len(),
        file_groups = tree.file_groups.len(),
        struct_maps = tree.struct_maps.len(),
        "parsed METS document"
    );
    Ok(tree)
}

// =============================================================================
// Sections
// =============================================================================

fn parse_dmd_sec(node: XmlNode<'_, '_>) -> DescriptiveSection {
    let payload = match child(node, "mdWrap") {
        Some(wrap) => {
            let md_type = attr(wrap, "MDTYPE");
            let data = child(wrap, "xmlData");
            if md_type == MDTYPE_DUBLIN_CORE {
                let dc = data
                    .and_then(|d| child(d, "dublincore"))
                    .map(parse_dublin_core)
                    .unwrap_or_default();
                DescriptivePayload::DublinCore(dc)
            } else if md_type == MDTYPE_PREMIS_OBJECT {
                let object = data
                    .and_then(|d| child(d, "object"))
                    .map(parse_premis_object)
                    .unwrap_or_default();
                DescriptivePayload::PremisObject(object)
            } else {
                DescriptivePayload::Other { md_type }
            }
        }
        None => DescriptivePayload::default(),
    };

    DescriptiveSection {
        id: attr(node, "ID"),
        payload,
        provenance: elements(node, "digiprovMD").map(parse_digiprov).collect(),
    }
}

fn parse_amd_sec(node: XmlNode<'_, '_>) -> AdministrativeSection {
    let technical = child(node, "techMD")
        .map(|tech| TechnicalMd {
            id: attr(tech, "ID"),
            object: descend(tech, &["mdWrap", "xmlData", "object"])
                .map(parse_premis_object)
                .unwrap_or_default(),
        })
        .unwrap_or_default();

    let source = child(node, "sourceMD").map(|src| SourceMd {
        fields: descend(src, &["mdWrap", "xmlData", "transfer_metadata"])
            .map(|meta| {
                meta.children()
                    .filter(Node::is_element)
                    .map(|n| (n.tag_name().name().to_string(), text(n)))
                    .collect()
            })
            .unwrap_or_default(),
    });

    AdministrativeSection {
        id: attr(node, "ID"),
        technical,
        provenance: elements(node, "digiprovMD").map(parse_digiprov).collect(),
        source,
    }
}

fn parse_premis_object(node: XmlNode<'_, '_>) -> PremisObject {
    let chars = child(node, "objectCharacteristics");
    let at = |path: &[&str]| chars.map(|c| text_at(c, path)).unwrap_or_default();

    let fits = chars.and_then(|c| descend(c, &["objectCharacteristicsExtension", "fits"]));
    let identity = fits.and_then(|f| descend(f, &["identification", "identity"]));

    PremisObject {
        original_name: text_at(node, &["originalName"]),
        identifiers: elements(node, "objectIdentifier")
            .filter_map(|id| child(id, "objectIdentifierValue"))
            .map(text)
            .collect(),
        fixity: Fixity {
            algorithm: at(&["fixity", "messageDigestAlgorithm"]),
            digest: at(&["fixity", "messageDigest"]),
        },
        size: at(&["size"]),
        format: FormatDesignation {
            name: at(&["format", "formatDesignation", "formatName"]),
            version: at(&["format", "formatDesignation", "formatVersion"]),
        },
        registry: FormatRegistry {
            name: at(&["format", "formatRegistry", "formatRegistryName"]),
            key: at(&["format", "formatRegistry", "formatRegistryKey"]),
        },
        date_created_by_application: at(&["creatingApplication", "dateCreatedByApplication"]),
        fits: fits
            .map(|f| FitsInfo {
                md5: text_at(f, &["fileinfo", "md5checksum"]),
                file_path: text_at(f, &["fileinfo", "filepath"]),
                file_name: text_at(f, &["fileinfo", "filename"]),
                last_modified: text_at(f, &["fileinfo", "fslastmodified"]),
                identity: identity
                    .map(|i| FitsIdentity {
                        format: attr(i, "format"),
                        mimetype: attr(i, "mimetype"),
                        tool_name: attr(i, "toolname"),
                        tool_version: attr(i, "toolversion"),
                    })
                    .unwrap_or_default(),
            })
            .unwrap_or_default(),
    }
}

fn parse_digiprov(node: XmlNode<'_, '_>) -> DigiprovBlock {
    let wrap = child(node, "mdWrap");
    let data = wrap.and_then(|w| child(w, "xmlData"));
    let event = data.and_then(|d| child(d, "event"));
    let agent = data.and_then(|d| child(d, "agent"));

    DigiprovBlock {
        id: attr(node, "ID"),
        md_type: wrap.map(|w| attr(w, "MDTYPE")).unwrap_or_default(),
        event: event.map(parse_event).unwrap_or_default(),
        agent: agent
            .map(|a| PremisAgent {
                identifier_type: text_at(a, &["agentIdentifier", "agentIdentifierType"]),
                identifier_value: text_at(a, &["agentIdentifier", "agentIdentifierValue"]),
                name: text_at(a, &["agentName"]),
                agent_type: text_at(a, &["agentType"]),
            })
            .unwrap_or_default(),
    }
}

fn parse_event(node: XmlNode<'_, '_>) -> PremisEvent {
    // Some producers put eventDetail directly under event.
    let detail = match descend(node, &["eventDetailInformation", "eventDetail"]) {
        Some(d) => text(d),
        None => text_at(node, &["eventDetail"]),
    };
    PremisEvent {
        identifier: text_at(node, &["eventIdentifier", "eventIdentifierValue"]),
        event_type: text_at(node, &["eventType"]),
        date_time: text_at(node, &["eventDateTime"]),
        detail,
        outcome: text_at(node, &["eventOutcomeInformation", "eventOutcome"]),
        outcome_note: text_at(
            node,
            &[
                "eventOutcomeInformation",
                "eventOutcomeDetail",
                "eventOutcomeDetailNote",
            ],
        ),
    }
}

fn parse_dublin_core(node: XmlNode<'_, '_>) -> DublinCore {
    let mut dc = DublinCore::default();
    for el in node.children().filter(Node::is_element) {
        let value = text(el);
        match el.tag_name().name() {
            "identifier" => dc.identifier = value,
            "title" => dc.title = value,
            "creator" => dc.creator = value,
            "date" => dc.date = value,
            "type" => dc.type_ = value,
            "format" => dc.format = value,
            "language" => dc.language.push(value),
            "contributor" => dc.contributor = value,
            "provenance" => dc.provenance = value,
            "subject" => dc.subject.push(value),
            "description" => dc.description = value,
            "publisher" => dc.publisher = value,
            "source" => dc.source = value,
            "relation" => dc.relation = value,
            "coverage" => dc.coverage = value,
            "rights" => dc.rights.push(value),
            other => {
                dc.terms.insert(other.to_string(), value);
            }
        }
    }
    dc
}

fn parse_file_group(node: XmlNode<'_, '_>) -> FileGroup {
    FileGroup {
        usage: attr(node, "USE"),
        files: elements(node, "file")
            .map(|f| FileRef {
                id: attr(f, "ID"),
                adm_id: attr(f, "ADMID"),
                href: child(f, "FLocat")
                    .map(|loc| attr(loc, "href"))
                    .unwrap_or_default(),
            })
            .collect(),
    }
}

fn parse_struct_map(node: XmlNode<'_, '_>) -> MetsResult<StructMap> {
    let root = match child(node, "div") {
        Some(div) => parse_div(div, 0)?,
        None => None,
    };
    Ok(StructMap {
        id: attr(node, "ID"),
        label: attr(node, "LABEL"),
        kind: attr(node, "TYPE"),
        root,
    })
}

/// Divs whose TYPE is neither "Directory" nor "Item" are dropped with their subtree.
fn parse_div(node: XmlNode<'_, '_>, depth: usize) -> MetsResult<Option<StructNode>> {
    if depth >= MAX_STRUCTURE_DEPTH {
        return Err(MetsError::StructureTooDeep {
            limit: MAX_STRUCTURE_DEPTH,
        });
    }
    let label = attr(node, "LABEL");
    let dmd_ids = split_ids(node.attribute("DMDID"));
    let adm_ids = split_ids(node.attribute("ADMID"));

    match node.attribute("TYPE").unwrap_or_default() {
        "Item" => Ok(Some(StructNode::Item {
            label,
            file_id: child(node, "fptr")
                .map(|f| attr(f, "FILEID"))
                .unwrap_or_default(),
            dmd_ids,
            adm_ids,
        })),
        "Directory" => {
            let mut children = Vec::new();
            for div in elements(node, "div") {
                if let Some(c) = parse_div(div, depth + 1)? {
                    children.push(c);
                }
            }
            Ok(Some(StructNode::Directory {
                label,
                dmd_ids,
                adm_ids,
                children,
            }))
        }
        other => {
            tracing::debug!(div_type = other, label = %label, "skipping structMap div");
            Ok(None)
        }
    }
}

// =============================================================================
// XML Helpers
// =============================================================================

fn split_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn elements<'a, 'input: 'a>(
    node: XmlNode<'a, 'input>,
    local: &'a str,
) -> impl Iterator<Item = XmlNode<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == local)
}

fn child<'a, 'input>(node: XmlNode<'a, 'input>, local: &str) -> Option<XmlNode<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == local)
}

fn descend<'a, 'input>(node: XmlNode<'a, 'input>, path: &[&str]) -> Option<XmlNode<'a, 'input>> {
    path.iter().try_fold(node, |n, local| child(n, local))
}

/// Attribute by local name, so `xlink:href` matches "href".
fn attr(node: XmlNode<'_, '_>, local: &str) -> String {
    node.attributes()
        .find(|a| a.name() == local)
        .map(|a| a.value().to_string())
        .unwrap_or_default()
}

fn text(node: XmlNode<'_, '_>) -> String {
    node.text().map(str::trim).unwrap_or_default().to_string()
}

fn text_at(node: XmlNode<'_, '_>, path: &[&str]) -> String {
    descend(node, path).map(text).unwrap_or_default()
}
