//! HTTP API specification: service, groups and routes.

use serde::{Deserialize, Serialize};

use super::Annotations;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSpec {
    /// Go module path generated imports are joined onto
    pub module: String,
    pub service: Service,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Routes sharing annotations such as `group`, `jwt` or `middleware`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub method: String,
    pub path: String,
    pub handler: String,
    #[serde(default)]
    pub request_type: Option<String>,
    #[serde(default)]
    pub response_type: Option<String>,
    /// Route-level annotations, including doc properties like `summary`
    #[serde(default)]
    pub annotations: Annotations,
}

impl Route {
    pub fn request_type_name(&self) -> Option<&str> {
        non_blank(&self.request_type)
    }

    pub fn response_type_name(&self) -> Option<&str> {
        non_blank(&self.response_type)
    }

    /// `GET /ping`, for diagnostics
    pub fn describe(&self) -> String {
        format!(
            "route {} {}",
            self.method.trim().to_uppercase(),
            self.path.trim()
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
