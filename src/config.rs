//! Server configuration, parsed from the command line.

use crate::storage::DEFAULT_SHARDS;
use crate::{DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;

/// SparkKV - an in-memory key-value server with float counters
#[derive(Debug, Clone, Parser)]
#[command(name = "sparkkv", version, about)]
pub struct Config {
    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Number of storage shards
    #[arg(long, default_value_t = DEFAULT_SHARDS, value_parser = parse_shards)]
    pub shards: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_shards(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("shard count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
