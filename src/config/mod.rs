//! Configuration module for the editor and CLI
//!
//! Provides types, discovery and parsing for `placer.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
