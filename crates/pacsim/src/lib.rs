//! Command-line front-end for the PAC simulation engine
//!
//! Loads a scenario from YAML (or uses the built-in defaults), runs one of the
//! engine entry points and renders the outcome as text or JSON. All I/O of the
//! workspace lives here; `pacsim_core` stays pure.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod report;
pub mod scenario;

pub use cli::{Cli, Command, OutputFormat};
pub use commands::execute;
pub use logging::init_logging;
