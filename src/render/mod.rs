//! Rendering: compile templates, execute them against a context, format and
//! write the result.

mod context;
mod engine;
mod formatter;
mod output;
mod variables;

pub use context::RenderContext;
pub use engine::{CompiledTemplate, RenderEngine};
pub use formatter::{CommandFormatter, Formatter};
pub use output::{Overwrite, WriteResult, write_file};
