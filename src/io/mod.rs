//! Side-effecting operations: subprocess invocation, config, export, signals.

pub mod config;
pub mod export;
pub mod generator;
pub mod interrupt;
pub mod process;
pub mod prompt;
