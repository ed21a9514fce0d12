// logscan - core/mod.rs
//
// Pure scanning logic: data model, timestamp extraction, line
// classification, context-window state machine, and the scan driver.
// No filesystem or terminal dependencies; the app layer owns those.

pub mod classify;
pub mod context;
pub mod model;
pub mod scan;
pub mod timestamp;
