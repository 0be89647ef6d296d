//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the psdfonts application.
///
/// - 0: Success (scan completed, fonts found)
/// - 1: General error (unexpected failure)
/// - 2: No fonts found (scan completed normally, nothing to report)
/// - 3: Partial success (completed, but some files failed to process)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and at least one font was found.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No fonts: Scan completed but no fonts were found.
    NoFonts = 2,
    /// Partial success: Scan completed but some files could not be processed.
    PartialSuccess = 3,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "PF000",
            Self::GeneralError => "PF001",
            Self::NoFonts => "PF002",
            Self::PartialSuccess => "PF003",
            Self::Interrupted => "PF130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "PF001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
