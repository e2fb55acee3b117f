pub mod config_cache;
pub mod intake;
pub mod selection;

pub use crate::domain::catalog::PublicConfig;
pub use crate::domain::model::{CanonicalSignup, Selection, SignupRequest};
pub use crate::domain::ports::{Clock, ConfigProvider, ConfigSource, SignupSink};
pub use crate::utils::error::Result;
