use std::net::SocketAddr;
use std::sync::Arc;

use clap::Args;
use tokio::time::Duration;

use crate::gateway::{
    OutcomeSource, SeededSource, SimulatedGateway, ThreadRngSource, SIMULATED_LATENCY,
    SUCCESS_PROBABILITY,
};

const DEFAULT_PAYMENT_DELAY_MS: u64 = SIMULATED_LATENCY.as_millis() as u64;

#[derive(Args, Clone, Debug)]
pub struct ServerConfig {
    /// Address the web server listens on
    #[arg(long, env = "TAWALA_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub gateway: GatewayConfig,

    /// Idle checkout sessions are dropped after this many seconds
    #[arg(long, env = "TAWALA_SESSION_TTL_SECS", default_value_t = 1800)]
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            gateway: GatewayConfig::default(),
            session_ttl_secs: 1800,
        }
    }
}

impl ServerConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs.max(1))
    }
}

#[derive(Args, Clone, Debug)]
pub struct GatewayConfig {
    /// Simulated gateway round-trip in milliseconds
    #[arg(long, env = "TAWALA_PAYMENT_DELAY_MS", default_value_t = DEFAULT_PAYMENT_DELAY_MS)]
    pub payment_delay_ms: u64,

    /// Probability that a simulated payment is approved
    #[arg(long, env = "TAWALA_SUCCESS_RATE", default_value_t = SUCCESS_PROBABILITY)]
    pub success_rate: f64,

    /// Seed for reproducible payment outcomes
    #[arg(long, env = "TAWALA_PAYMENT_SEED")]
    pub seed: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            payment_delay_ms: DEFAULT_PAYMENT_DELAY_MS,
            success_rate: SUCCESS_PROBABILITY,
            seed: None,
        }
    }
}

impl GatewayConfig {
    pub fn build(&self) -> SimulatedGateway {
        let source: Arc<dyn OutcomeSource> = match self.seed {
            Some(seed) => Arc::new(SeededSource::new(seed)),
            None => Arc::new(ThreadRngSource),
        };
        SimulatedGateway::new(source)
            .with_latency(Duration::from_millis(self.payment_delay_ms))
            .with_success_probability(self.success_rate)
    }
}
