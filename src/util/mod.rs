//! Utility modules

pub mod paths;

pub use paths::{DataPaths, DATA_DIR_ENV};
