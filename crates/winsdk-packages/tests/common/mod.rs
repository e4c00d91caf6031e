//! Common test infrastructure for winsdk-packages tests
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
//! - `constants`: Package ids and version strings
//! - `fixtures`: `.nupkg` builders and on-disk package folders
//! - `mock_server`: Wiremock setup helpers for feed tests
//! - `mocks`: In-memory `NuGetFeed` recording every call

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod fixtures;
pub mod mock_server;
pub mod mocks;

pub use constants::*;
pub use fixtures::*;
pub use mock_server::*;
pub use mocks::*;
