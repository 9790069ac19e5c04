//! RPC service specification.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcSpec {
    /// Go module path generated imports are joined onto
    pub module: String,
    pub service: RpcService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcService {
    pub name: String,
    /// Import path of the generated protobuf package
    pub go_package: String,
    #[serde(default)]
    pub methods: Vec<RpcMethod>,
}

impl RpcService {
    /// Package identifier of the protobuf package, its last path segment
    pub fn pb_name(&self) -> &str {
        let trimmed = self.go_package.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcMethod {
    pub name: String,
    pub request_type: String,
    pub response_type: String,
    #[serde(default)]
    pub streams_request: bool,
    #[serde(default)]
    pub streams_response: bool,
    /// Doc comment lines without the leading `//`
    #[serde(default)]
    pub doc: Option<String>,
}
