//! Parsed service specifications.
//!
//! The generator does not parse `.api` or `.proto` sources itself. It reads a
//! specification tree that was already parsed upstream and serialized as YAML
//! or JSON. The tree is consumed read-only.

mod api;
mod manifest;
mod model;
mod rpc;

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::{Error, Result};

pub use api::{ApiSpec, Group, Route, Service};
pub use manifest::ManifestSpec;
pub use model::{Field, ModelSpec, MongoSpec, Table};
pub use rpc::{RpcMethod, RpcService, RpcSpec};

/// String-keyed annotations attached to a specification node
pub type Annotations = BTreeMap<String, String>;

/// Load a specification document from disk.
///
/// `.json` files are parsed as JSON and `.yaml`/`.yml` files as YAML. Any
/// other extension is tried as JSON first, then as YAML.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let spec_load = |message: String| Error::SpecLoad {
        path: path.to_path_buf(),
        message,
    };

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let spec = match extension {
        "json" => serde_json::from_str(&content).map_err(|e| spec_load(e.to_string()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| spec_load(e.to_string()))?,
        _ => serde_json::from_str(&content)
            .or_else(|_| serde_yaml::from_str(&content))
            .map_err(|e| spec_load(e.to_string()))?,
    };

    debug!(path = %path.display(), "Loaded specification");
    Ok(spec)
}
