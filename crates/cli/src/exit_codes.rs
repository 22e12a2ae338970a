//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract - scripts rely on them.
//!
//! | Code | Description                                              |
//! |------|----------------------------------------------------------|
//! | 0    | Success, including runs with skipped files or no data    |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (bad args)                               |
//! | 3    | Source directory cannot be listed                        |
//! | 4    | Config file missing or invalid                           |
//! | 5    | Output file cannot be written                            |

use colorqc_core::ExtractError;

/// Success - the output file was written.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Source directory does not exist or cannot be listed.
pub const EXIT_SOURCE_UNREADABLE: u8 = 3;

/// Config file cannot be read, parsed, or validated.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Output file cannot be created or written.
pub const EXIT_WRITE_FAILED: u8 = 5;

/// Map a library error to its exit code.
pub fn extract_exit_code(err: &ExtractError) -> u8 {
    match err {
        ExtractError::Read { .. } => EXIT_SOURCE_UNREADABLE,
        ExtractError::Config(_) => EXIT_INVALID_CONFIG,
        ExtractError::Write { .. } => EXIT_WRITE_FAILED,
        ExtractError::MalformedInput { .. } => EXIT_ERROR,
    }
}
