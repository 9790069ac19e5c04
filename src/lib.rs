//! svcgen: template repository and generation pipeline for service scaffolding.
//!
//! The crate resolves per-category templates (builtin defaults shadowed by
//! on-disk overrides), renders them against contexts derived from a service
//! specification and writes the results into a target directory.
#![deny(unsafe_code)]

pub mod core;
pub mod generation;
pub mod render;
pub mod spec;
pub mod templates;
