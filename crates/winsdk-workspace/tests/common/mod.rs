//! Common test infrastructure for winsdk-workspace tests
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
//! - `constants`: Published package versions
//! - `fixtures`: Package folder contents and pinned configurations
//! - `mocks`: A feed materializing SDK packages, a recording process runner
//!   and a recording confirmation port
//! - `harness`: A setup service wired over a temporary project

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
