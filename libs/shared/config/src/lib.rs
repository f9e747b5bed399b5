use std::env;
use std::net::SocketAddr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|raw| {
                raw.parse()
                    .map_err(|_| warn!("BIND_ADDR is not a valid socket address: {}", raw))
                    .ok()
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .map(|raw| matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            bind_addr,
            seed_demo_data,
        }
    }
}
