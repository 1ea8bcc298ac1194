//! Checks whether a Docker Engine is reachable and reports its version and system info.

pub mod core;
pub mod logging;
pub mod utils;
