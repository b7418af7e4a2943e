pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod session;
pub mod storage;
