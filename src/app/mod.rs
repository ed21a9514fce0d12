// logscan - app/mod.rs
//
// Orchestration layer: file access, scan lifecycle, terminal rendering.

pub mod render;
pub mod run;
