//! Integration tests for Chronicle
//!
//! These tests drive the orchestrator and the CLI against real directories.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli;
pub mod restore_flow;
pub mod transfer_flow;
