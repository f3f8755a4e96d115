//! Flattens a METS archival-package description into a per-file JSON manifest.
//!
//! The four METS subtrees (structural map, administrative metadata,
//! descriptive metadata, file section) are only related through identifier
//! references. This crate walks the structure, builds ID-keyed indices over
//! the other three sections and joins them into one record per file.
//!
//! Pipeline: [`ingest`] → [`structmap`] → [`filesec`] / [`descriptive`] →
//! [`provenance`] → [`assemble`] → [`schema`] → [`emit`].

pub mod assemble;
pub mod descriptive;
pub mod digest;
pub mod emit;
pub mod error;
pub mod filesec;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod provenance;
pub mod schema;
pub mod structmap;

// Convenience re-exports
pub use assemble::{assemble, AssembleOptions, Manifest, ManifestEntry};
pub use digest::SourceDigests;
pub use emit::{output_path, write_manifest, OUTPUT_SUFFIX};
pub use error::{MetsError, MetsResult};
pub use ingest::parse_package;
pub use model::PackageTree;
pub use pipeline::{convert_document, convert_file, Conversion};
pub use schema::{render, ManifestDocument, SchemaVariant};
