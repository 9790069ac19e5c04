//! Deployment description for the Dockerfile and Kubernetes scaffolds.

use serde::{Deserialize, Serialize};

fn default_namespace() -> String {
    "default".to_string()
}

fn default_replicas() -> u32 {
    1
}

fn default_go_version() -> String {
    "1.22".to_string()
}

fn default_main() -> String {
    "main.go".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSpec {
    pub name: String,
    pub image: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default = "default_go_version")]
    pub go_version: String,
    /// Go entry file compiled into the image
    #[serde(default = "default_main")]
    pub main: String,
}
