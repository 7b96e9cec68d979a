pub mod config;

pub use config::TracingConfig;
