//! Keyword fact generator backed by a local LLM subprocess.
//!
//! Repeatedly asks a local model (via `ollama run` by default) for one new
//! fact about a keyword, cleans and deduplicates the answers, and exports the
//! accepted set to a spreadsheet. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (cleaning, acceptance filters,
//!   loop bookkeeping). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (subprocess invocation, config,
//!   spreadsheet export, signal handling). Isolated to enable mocking in
//!   tests.
//!
//! [`run`] coordinates core logic with I/O to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
