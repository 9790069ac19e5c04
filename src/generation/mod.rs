//! Generation pipeline: backends plan targets from a specification, the
//! pipeline renders and writes them.

pub mod annotation;
pub mod backends;
mod imports;
mod pipeline;
mod target;

pub use imports::{ImportSet, join_package};
pub use pipeline::{Backend, GenerationPipeline, GenerationReport};
pub use target::GenerationTarget;
