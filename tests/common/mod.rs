//! Shared test utilities for Chronicle
//!
//! Fixture builders for backup directories and interchange files, plus a
//! throwaway application context.

pub mod fixtures;
