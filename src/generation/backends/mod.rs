//! Backend adapters, one per generation target.

pub mod api;
pub mod manifest;
pub mod model;
pub mod mongo;
pub mod rpc;

pub use api::ApiBackend;
pub use manifest::ManifestBackend;
pub use model::ModelBackend;
pub use mongo::MongoBackend;
pub use rpc::RpcBackend;
