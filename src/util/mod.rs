// logscan - util/mod.rs
//
// Ambient utilities: constants, error types, logging.

pub mod constants;
pub mod error;
pub mod logging;
