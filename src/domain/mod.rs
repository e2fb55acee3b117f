// Domain layer: models and ports. No I/O here, adapters live under crate::adapters.

pub mod catalog;
pub mod model;
pub mod ports;
