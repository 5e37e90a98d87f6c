//! Pure, deterministic logic: cleaning, fact records, acceptance filtering.

pub mod clean;
pub mod collector;
pub mod fact;
