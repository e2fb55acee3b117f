// Adapters layer: concrete implementations of the domain ports (http backend, storage, clock).

pub mod clock;
pub mod http;
#[cfg(feature = "lambda")]
pub mod s3;
pub mod static_config;
pub mod storage;
