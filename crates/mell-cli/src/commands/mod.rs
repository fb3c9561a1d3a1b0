//! Command handlers. Each one turns parsed arguments into core calls and
//! prints the result; no metadata logic lives here.

pub mod completions;
pub mod config;
pub mod generate;
pub mod session;
pub mod show;
