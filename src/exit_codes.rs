//! Stable exit codes for the CLI.

/// Run finished (completed, aborted, or interrupted) and the export succeeded.
pub const OK: i32 = 0;
/// Invalid configuration or keyword; nothing was run.
pub const INVALID: i32 = 1;
/// The run finished but the export step failed.
pub const EXPORT_FAILED: i32 = 2;
