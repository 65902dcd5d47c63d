use std::path::PathBuf;

use clap::Parser;
use idx_common::config::{env_or, env_parse, BrokerEndpoint};
use idx_common::error::Result;
use idx_common::Language;

/// Coordinator configuration (§6 and §10): environment variables provide
/// the defaults, CLI flags override them.
#[derive(Debug, Parser)]
#[command(name = "idx-coordinator", about = "Distributed inverted-index coordinator")]
pub struct Cli {
    #[arg(long, env = "COORDINATOR_PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "REDIS_HOST")]
    pub redis_host: Option<String>,

    #[arg(long, env = "REDIS_PORT")]
    pub redis_port: Option<u16>,

    #[arg(long, env = "LOCAL_UPLOADS_PATH")]
    pub uploads_path: Option<PathBuf>,

    #[arg(long, env = "INDEX_FILE_STORAGE_PATH")]
    pub index_path: Option<PathBuf>,

    #[arg(long, env = "COORDINATOR_PROCESSING_LANGUAGE")]
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub broker: BrokerEndpoint,
    pub uploads_path: PathBuf,
    pub index_path: PathBuf,
    pub language: Language,
}

impl Config {
    pub fn resolve(cli: Cli) -> Result<Self> {
        let broker = BrokerEndpoint {
            host: cli.redis_host.unwrap_or_else(|| env_or("REDIS_HOST", "127.0.0.1")),
            port: match cli.redis_port {
                Some(p) => p,
                None => env_parse("REDIS_PORT", 6379u16)?,
            },
        };

        let language = match cli.language {
            Some(raw) => raw.parse()?,
            None => idx_common::config::processing_language_from_env()?,
        };

        Ok(Config {
            port: match cli.port {
                Some(p) => p,
                None => env_parse("COORDINATOR_PORT", 8000u16)?,
            },
            broker,
            uploads_path: cli
                .uploads_path
                .unwrap_or_else(|| PathBuf::from(env_or("LOCAL_UPLOADS_PATH", "./uploads"))),
            index_path: cli.index_path.unwrap_or_else(|| {
                PathBuf::from(env_or("INDEX_FILE_STORAGE_PATH", "./index.json.gz"))
            }),
            language,
        })
    }
}
