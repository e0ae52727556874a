//! CLI subcommands

pub mod diff;
pub mod doctor;
pub mod explain;
pub mod generate;
pub mod init;
pub mod specialize;
pub mod targets;
