//! Template categories and the keys that identify one template.
//!
//! # Examples
//!
//! ```
//! use svcgen::templates::{Category, TemplateKey};
//! use std::str::FromStr;
//!
//! let category = Category::from_str("rpc").unwrap();
//! assert_eq!(category, Category::Rpc);
//! assert_eq!(TemplateKey::new(category, "etc.tpl").to_string(), "rpc/etc.tpl");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// A generation domain with its own set of templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// HTTP handlers and logic
    Api,
    /// RPC logic and service configuration
    Rpc,
    /// SQL table models
    Model,
    /// Dockerfile
    Docker,
    /// Kubernetes deployment manifests
    Kube,
    /// Mongo collection models
    Mongo,
}

/// A builtin template and the context variables it cannot render without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTemplate {
    pub name: &'static str,
    pub required: &'static [&'static str],
}

const API_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "handler.tpl",
        required: &[
            "pkg_name",
            "imports",
            "handler_name",
            "summary",
            "tag",
            "method",
            "path",
            "has_security",
            "has_request",
            "request_type",
            "logic_pkg",
            "logic_type",
            "has_response",
            "call",
            "after_1_1_10",
        ],
    },
    BuiltinTemplate {
        name: "logic.tpl",
        required: &[
            "pkg_name",
            "imports",
            "logic",
            "function",
            "summary",
            "request",
            "response_type",
            "return_string",
        ],
    },
];

const RPC_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "logic.tpl",
        required: &["imports", "logic_name", "functions"],
    },
    BuiltinTemplate {
        name: "logic-func.tpl",
        required: &[
            "has_comment",
            "comment",
            "logic_name",
            "method",
            "has_req",
            "request",
            "stream",
            "stream_body",
            "has_reply",
            "response",
            "response_type",
        ],
    },
    BuiltinTemplate {
        name: "etc.tpl",
        required: &["service_name"],
    },
];

const MODEL_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "model.tpl",
        required: &[
            "pkg",
            "imports",
            "table",
            "upper_table",
            "lower_table",
            "fields",
            "with_cache",
        ],
    },
    BuiltinTemplate {
        name: "import.tpl",
        required: &["time"],
    },
    BuiltinTemplate {
        name: "import-no-cache.tpl",
        required: &["time"],
    },
    BuiltinTemplate {
        name: "vars.tpl",
        required: &["pkg"],
    },
];

const DOCKER_TEMPLATES: &[BuiltinTemplate] = &[BuiltinTemplate {
    name: "docker.tpl",
    required: &["go_version", "exe_file", "go_main", "has_port", "port"],
}];

const KUBE_TEMPLATES: &[BuiltinTemplate] = &[BuiltinTemplate {
    name: "deployment.tpl",
    required: &["name", "namespace", "replicas", "image", "port"],
}];

const MONGO_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: "model.tpl",
        required: &["type_name", "lower_type", "cache"],
    },
    BuiltinTemplate {
        name: "error.tpl",
        required: &[],
    },
];

impl Category {
    /// Every category, in the order lifecycle commands visit them
    pub const ALL: [Category; 6] = [
        Category::Api,
        Category::Rpc,
        Category::Model,
        Category::Docker,
        Category::Kube,
        Category::Mongo,
    ];

    /// Returns the category as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Rpc => "rpc",
            Self::Model => "model",
            Self::Docker => "docker",
            Self::Kube => "kube",
            Self::Mongo => "mongo",
        }
    }

    /// The builtin templates shipped for this category
    pub fn builtin_templates(&self) -> &'static [BuiltinTemplate] {
        match self {
            Self::Api => API_TEMPLATES,
            Self::Rpc => RPC_TEMPLATES,
            Self::Model => MODEL_TEMPLATES,
            Self::Docker => DOCKER_TEMPLATES,
            Self::Kube => KUBE_TEMPLATES,
            Self::Mongo => MONGO_TEMPLATES,
        }
    }

    /// Look up one builtin template by file name
    pub fn builtin(&self, name: &str) -> Option<&'static BuiltinTemplate> {
        self.builtin_templates().iter().find(|t| t.name == name)
    }

    /// Keys of every builtin template in this category
    pub fn keys(self) -> impl Iterator<Item = TemplateKey> {
        self.builtin_templates()
            .iter()
            .map(move |t| TemplateKey::new(self, t.name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                Error::config(format!(
                    "unexpected category: {s}, expected one of [api, rpc, model, docker, kube, mongo]"
                ))
            })
    }
}

/// Identifies one template: a category plus a template file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateKey {
    pub category: Category,
    pub name: String,
}

impl TemplateKey {
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }

    /// Whether a builtin template exists for this key
    pub fn is_builtin(&self) -> bool {
        self.category.builtin(&self.name).is_some()
    }

    /// Context variables the template for this key requires; empty for custom-only keys
    pub fn required_variables(&self) -> &'static [&'static str] {
        self.category
            .builtin(&self.name)
            .map(|t| t.required)
            .unwrap_or(&[])
    }

    /// Path of the template relative to a store root, `category/name`
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}
