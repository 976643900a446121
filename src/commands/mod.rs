//! CLI command implementations.

pub mod check;
pub mod init;
pub mod tasks;
pub mod update;
pub mod validate;
