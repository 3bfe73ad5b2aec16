//! Configuration module for sumi-kv
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_kv::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("store.toml")).unwrap();
//! println!("Crawl state prefix: {}", config.storage.prefix);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, RedisConfig, StorageConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
