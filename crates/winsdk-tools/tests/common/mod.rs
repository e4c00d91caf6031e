//! Common test infrastructure for winsdk-tools tests
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Versions, tool names and manifest content
//! - `fixtures`: BuildTools folder trees, pins and manifests on disk
//! - `mocks`: Recording process runner and a BuildTools-only feed
//! - `harness`: Services wired over a temporary workspace

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use constants::*;
pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
