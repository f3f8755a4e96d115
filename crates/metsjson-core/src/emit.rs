//! Output emitter: serializes a rendered manifest under the output directory.

use crate::error::{MetsError, MetsResult};
use crate::schema::ManifestDocument;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Suffix appended to the package name to form the output file name.
pub const OUTPUT_SUFFIX: &str = "_metadata.json";

/// `<out_dir>/<package_name>_metadata.json`
///
/// The package name comes from the document, so it must stay a single
/// component: no separators, no `.`/`..`, nothing absolute.
pub fn output_path(out_dir: &Path, package_name: &str) -> MetsResult<PathBuf> {
    let file_name = format!("{package_name}{OUTPUT_SUFFIX}");
    let single_component = matches!(
        Path::new(&file_name).components().collect::<Vec<_>>().as_slice(),
        [Component::Normal(_)]
    );
    if !single_component
        || package_name.contains(['/', '\\'])
        || package_name == "."
        || package_name == ".."
    {
        return Err(MetsError::UnsafePackageName {
            name: package_name.to_string(),
        });
    }
    Ok(out_dir.join(file_name))
}

/// Pretty-printed JSON (two-space indent, no trailing newline).
pub fn to_json(doc: &ManifestDocument) -> MetsResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(doc)?)
}

/// Write `doc` to [`output_path`].
///
/// The document is serialized first and written to a temporary file in
/// `out_dir` that is renamed into place, so a failed run leaves no output.
pub fn write_manifest(doc: &ManifestDocument, out_dir: &Path) -> MetsResult<PathBuf> {
    let target = output_path(out_dir, doc.storage_location())?;
    let bytes = to_json(doc)?;
    let write_err = |source| MetsError::Write {
        path: target.clone(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(out_dir).map_err(write_err)?;
    tmp.write_all(&bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&target).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %target.display(), bytes = bytes.len(), "wrote manifest");
    Ok(target)
}
