//! Process exit codes. Part of the CLI contract.

use metsjson_core::MetsError;

pub const SUCCESS: i32 = 0;
pub const CONVERSION_FAILED: i32 = 1; // Input unreadable or invalid
pub const USAGE_ERROR: i32 = 2; // Missing/empty input or bad configuration
pub const OUTPUT_FAILED: i32 = 3; // Manifest could not be serialized or written

/// Exit code for a fatal error. Errors that did not originate in the
/// conversion library count as conversion failures.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<MetsError>()
        .map(MetsError::exit_code)
        .unwrap_or(CONVERSION_FAILED)
}
