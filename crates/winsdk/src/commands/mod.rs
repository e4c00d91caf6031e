//! CLI command implementations

pub mod cert;
pub mod debug_identity;
pub mod manifest;
pub mod msix;
pub mod package;
pub mod paths;
pub mod setup;
pub mod sign;
pub mod tool;
pub mod update;
