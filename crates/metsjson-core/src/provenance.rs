//! PREMIS provenance extraction and format-identification tool lookup.

use crate::error::{MetsError, MetsResult};
use crate::model::{AdministrativeSection, DigiprovBlock};
use crate::schema::{AgentRecord, EventRecord};
use std::collections::BTreeMap;

/// `mdWrap/@MDTYPE` of a PREMIS event block.
pub const MDTYPE_EVENT: &str = "PREMIS:EVENT";

/// `mdWrap/@MDTYPE` of a PREMIS agent block.
pub const MDTYPE_AGENT: &str = "PREMIS:AGENT";

/// Format-identification tools recognised in event details.
pub const KNOWN_TOOLS: &[&str] = &["Siegfried"];

/// Events and agents of one section, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub events: Vec<EventRecord>,
    pub agents: Vec<AgentRecord>,
}

/// Classify digiprovMD blocks by MDTYPE. Other types are skipped.
pub fn extract(blocks: &[DigiprovBlock]) -> Provenance {
    let mut out = Provenance::default();
    for block in blocks {
        match block.md_type.as_str() {
            MDTYPE_EVENT => out.events.push(event_record(block)),
            MDTYPE_AGENT => out.agents.push(AgentRecord {
                identifier_type: block.agent.identifier_type.clone(),
                identifier_value: block.agent.identifier_value.clone(),
                name: block.agent.name.clone(),
                agent_type: block.agent.agent_type.clone(),
            }),
            _ => {}
        }
    }
    out
}

fn event_record(block: &DigiprovBlock) -> EventRecord {
    let e = &block.event;
    EventRecord {
        uuid: e.identifier.clone(),
        event_type: e.event_type.clone(),
        datetime: e.date_time.clone(),
        outcome: e.outcome.clone(),
        detail: e.detail.clone(),
        detail_note: e.outcome_note.clone(),
    }
}

/// Scan metadata recovered from a format-identification event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolScan {
    pub program: String,
    pub version: String,
    pub scan_date: String,
    /// Every `key="value"` pair of the event detail.
    pub details: BTreeMap<String, String>,
}

/// First event, across all sections in document order, whose detail names a
/// known tool.
pub fn find_tool_event(sections: &[AdministrativeSection]) -> Option<EventRecord> {
    sections
        .iter()
        .flat_map(|s| s.provenance.iter())
        .filter(|b| b.md_type == MDTYPE_EVENT)
        .find(|b| KNOWN_TOOLS.iter().any(|t| b.event.detail.contains(t)))
        .map(event_record)
}

/// Parse `key="value"; key="value"` into a map.
///
/// Every segment must be a non-empty key, `=`, and a double-quoted value.
/// At least `program` and `version` must be present.
pub fn parse_tool_detail(detail: &str) -> MetsResult<BTreeMap<String, String>> {
    let mut pairs = BTreeMap::new();
    for (i, segment) in split_unquoted(detail).into_iter().map(str::trim).enumerate() {
        if segment.is_empty() {
            return Err(MetsError::malformed_tool_detail(
                detail,
                format!("empty segment at position {i}"),
            ));
        }
        let Some((key, value)) = segment.split_once('=') else {
            return Err(MetsError::malformed_tool_detail(
                detail,
                format!("segment '{segment}' has no '='"),
            ));
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            return Err(MetsError::malformed_tool_detail(
                detail,
                format!("segment '{segment}' has an empty key"),
            ));
        }
        let unquoted = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .ok_or_else(|| {
                MetsError::malformed_tool_detail(
                    detail,
                    format!("value of '{key}' is not double-quoted"),
                )
            })?;
        pairs.insert(key.to_string(), unquoted.to_string());
    }

    for required in ["program", "version"] {
        if !pairs.contains_key(required) {
            return Err(MetsError::malformed_tool_detail(
                detail,
                format!("missing '{required}'"),
            ));
        }
    }
    Ok(pairs)
}

/// Split on `;` outside double quotes.
fn split_unquoted(detail: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in detail.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => {
                segments.push(&detail[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&detail[start..]);
    segments
}

/// Locate and parse the format-identification event. `Ok(None)` when no
/// event names a known tool.
pub fn scan_metadata(sections: &[AdministrativeSection]) -> MetsResult<Option<ToolScan>> {
    let Some(event) = find_tool_event(sections) else {
        tracing::debug!("no format-identification tool event found");
        return Ok(None);
    };
    let mut details = parse_tool_detail(&event.detail)?;
    let program = details.remove("program").unwrap_or_default();
    let version = details.remove("version").unwrap_or_default();
    tracing::debug!(%program, %version, "located format-identification tool");

    Ok(Some(ToolScan {
        program,
        version,
        scan_date: event.datetime,
        details,
    }))
}
