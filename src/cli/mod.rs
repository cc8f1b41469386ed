//! Command-line front end

pub mod commands;

pub use commands::{
    cmd_address, cmd_generate, cmd_inspect, inspect_script, CliResult, ScriptReport,
};
