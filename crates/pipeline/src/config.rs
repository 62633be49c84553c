//! Pipeline configuration with environment overrides.

use std::net::IpAddr;
use std::time::Duration;

/// Default UDP port the game broadcasts on.
pub const DEFAULT_PORT: u16 = 20127;

/// How the pipeline binds, queues and scales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Capacity of the raw-datagram queue between receiver and workers.
    pub raw_queue_capacity: usize,
    /// Capacity of the decoded-packet queue between workers and aggregator.
    pub decoded_queue_capacity: usize,
    pub num_workers: usize,
    /// Socket read timeout; bounds how long shutdown can take.
    pub receive_timeout: Duration,
    /// Queue receive timeout for workers and the aggregator.
    pub queue_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            raw_queue_capacity: 512,
            decoded_queue_capacity: 512,
            num_workers: default_workers(),
            receive_timeout: Duration::from_millis(200),
            queue_timeout: Duration::from_millis(100),
        }
    }
}

impl PipelineConfig {
    /// Defaults with `PITWALL_PORT` and `PITWALL_WORKERS` applied on top.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_u16("PITWALL_PORT", defaults.port),
            num_workers: env_usize("PITWALL_WORKERS", defaults.num_workers).max(1),
            ..defaults
        }
    }
}

/// Half the cores; decode is cheap relative to everything else sharing
/// the box with a running game.
fn default_workers() -> usize {
    (num_cpus::get() / 2).max(1)
}

fn env_u16(name: &str, default: u16) -> u16 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
