pub mod backend;
pub mod connection_config;
pub mod dial;
pub mod session;
pub mod verifier;

pub use backend::MongoBackend;
