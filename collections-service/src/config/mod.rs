use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LedgerConfig {
    /// Path of the JSON ledger document. Absent means an in-memory ledger
    /// (tests, ephemeral deployments).
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("COLLECTIONS_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("COLLECTIONS_SERVICE_PORT")
            .unwrap_or_else(|_| "3006".to_string())
            .parse()?;

        let ledger_path = env::var("COLLECTIONS_LEDGER_PATH").ok().map(PathBuf::from);

        Ok(Self {
            server: ServerConfig { host, port },
            ledger: LedgerConfig { path: ledger_path },
            service_name: "collections-service".to_string(),
        })
    }
}
