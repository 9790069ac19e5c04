//! Template repository: builtin templates, on-disk overrides and their lifecycle.

mod category;
mod embedded;
mod home;
mod overlay;
mod repository;

pub use category::{BuiltinTemplate, Category, TemplateKey};
pub use embedded::BuiltinStore;
pub use home::{
    DEFAULT_HOME_DIR, EnvHomeConfigReader, HOME_ENV, HomeConfigReader, register_home,
    resolve_default_home, template_home,
};
pub use overlay::OverlayStore;
pub use repository::{TemplateListing, TemplateOrigin, TemplateRecord, TemplateRepository};

use crate::core::error::Result;

/// A source of template text keyed by [`TemplateKey`]
pub trait TemplateStore {
    /// Short store name used in logs
    fn name(&self) -> &'static str;

    /// Template text for `key`, or `None` when this store has no entry
    fn get(&self, key: &TemplateKey) -> Result<Option<String>>;
}
