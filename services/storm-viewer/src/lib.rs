//! Storm density viewer library.
//!
//! This module exposes the internal modules for testing purposes.

pub mod commands;
pub mod config;
pub mod loader;
