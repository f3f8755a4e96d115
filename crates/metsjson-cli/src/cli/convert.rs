use super::args::Cli;
use super::prompt;
use crate::config;
use anyhow::Context;
use metsjson_core::{convert_file, Conversion};

/// Resolve inputs, then convert. Both inputs are settled before any file is
/// read.
pub fn run(cli: Cli) -> anyhow::Result<Conversion> {
    let variant = config::schema_variant()?;
    let mets = match cli.mets {
        Some(p) => p,
        None => prompt::ask_path("Path to METS file", "METS file")?,
    };
    let out = match cli.out {
        Some(p) => p,
        None => prompt::ask_path("Output directory", "output directory")?,
    };
    tracing::debug!(mets = %mets.display(), out = %out.display(), %variant, "resolved inputs");

    let conversion = convert_file(&mets, &out, variant)
        .with_context(|| format!("converting {}", mets.display()))?;
    Ok(conversion)
}
