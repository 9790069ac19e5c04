//! Cross-cutting building blocks: errors, configuration, naming styles and
//! version gating.

pub mod config;
pub mod error;
pub mod naming;
pub mod version;

pub use error::{Error, Result};
