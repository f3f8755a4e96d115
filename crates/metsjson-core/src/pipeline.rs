//! End-to-end conversion: read → parse → assemble → render → write.

use crate::assemble::{assemble, AssembleOptions, Manifest};
use crate::digest::SourceDigests;
use crate::emit::{write_manifest, OUTPUT_SUFFIX};
use crate::error::{MetsError, MetsResult};
use crate::ingest::parse_package;
use crate::schema::{render, ManifestDocument, SchemaVariant};
use std::path::{Path, PathBuf};

/// Outcome of a successful [`convert_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: PathBuf,
    pub package_name: String,
    pub file_count: u64,
    pub total_bytes: u64,
}

/// Convert METS document bytes into a manifest and its rendered document.
pub fn convert_document(
    bytes: &[u8],
    variant: SchemaVariant,
) -> MetsResult<(Manifest, ManifestDocument)> {
    let xml = std::str::from_utf8(bytes)?;
    let tree = parse_package(xml)?;
    let opts = AssembleOptions {
        source_digests: SourceDigests::of(bytes),
    };
    let manifest = assemble(&tree, &opts)?;
    let doc = render(&manifest, variant);
    Ok((manifest, doc))
}

/// Convert the METS file at `input` and write the manifest under `out_dir`.
pub fn convert_file(
    input: &Path,
    out_dir: &Path,
    variant: SchemaVariant,
) -> MetsResult<Conversion> {
    let bytes = std::fs::read(input).map_err(|source| MetsError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %input.display(), bytes = bytes.len(), schema = %variant, "read METS document");

    let (manifest, doc) = convert_document(&bytes, variant)?;
    if manifest.package_name.is_empty() {
        tracing::warn!("package name is empty; output file will be named '{OUTPUT_SUFFIX}'");
    }
    let output = write_manifest(&doc, out_dir)?;

    tracing::info!(
        package = %manifest.package_name,
        files = manifest.file_count,
        total_bytes = manifest.total_bytes,
        output = %output.display(),
        "manifest written"
    );
    Ok(Conversion {
        output,
        package_name: manifest.package_name,
        file_count: manifest.file_count,
        total_bytes: manifest.total_bytes,
    })
}
