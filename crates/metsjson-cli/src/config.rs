//! Environment configuration beyond the command-line flags.

use metsjson_core::{MetsError, SchemaVariant};

/// Selects the output layout: `mets` (default) or `legacy`.
pub const SCHEMA_ENV: &str = "METSJSON_SCHEMA";

/// Schema variant from [`SCHEMA_ENV`]. Unset or blank selects the default.
pub fn schema_variant() -> Result<SchemaVariant, MetsError> {
    parse_schema_variant(std::env::var(SCHEMA_ENV).ok().as_deref())
}

fn parse_schema_variant(value: Option<&str>) -> Result<SchemaVariant, MetsError> {
    match value.map(str::trim) {
        None | Some("") => Ok(SchemaVariant::default()),
        Some(v) => v.parse(),
    }
}
