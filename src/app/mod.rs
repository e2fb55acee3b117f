pub mod service;

pub use service::WaitlistService;
