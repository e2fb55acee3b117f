pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use adapters::s3::S3SignupStore;
#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use crate::app::WaitlistService;
pub use crate::config::TomlConfig;
pub use crate::core::intake::{SubmitResponse, WaitlistIntake};
pub use utils::error::{Result, WaitlistError};
