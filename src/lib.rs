pub mod catalog;
pub mod chat;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod ingest;
pub mod params;
pub mod store;

pub use config::Config;
pub use error::{AfinaError, Result};
pub use params::GenerationParameters;
