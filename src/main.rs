//! application entry point

use derive_more::Display;
use log::info;
use std::env;
use std::net::SocketAddrV4;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tableside::model::config::{BackendConfig, ServerConfig};
use tableside::server;

const DOTENV_LOADING_FAILED_MSG: &str = "failed to load envs from dotenv files, aborting";
const HOST_PARSING_FAILED_MSG: &str = "failed to parse HOST, aborting";
const BACKEND_URL_MISSING_MSG: &str = "BACKEND_URL is not set, aborting";
const DEFAULT_HOST_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;

#[actix_web::main()]
async fn main() -> std::io::Result<()> {
    // bootstrap
    // a. env
    let env = env::var("APP_ENV")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Env::Dev); // default dev env if absent

    match env {
        Env::Prod | Env::Stg => {} // load in CI
        Env::Dev => dotenvy::from_path(Path::new(".env.dev"))
            .map_err(|e| std::io::Error::other(format!("{DOTENV_LOADING_FAILED_MSG}, {e}")))?,
    };

    // b. logging
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // c. run app
    let addr = SocketAddrV4::from_str(
        env::var("HOST")
            .unwrap_or(DEFAULT_HOST_ADDR.to_string())
            .as_str(),
    )
    .map_err(|e| std::io::Error::other(format!("{HOST_PARSING_FAILED_MSG}, {e}")))?;
    let backend = BackendConfig::new(
        env::var("BACKEND_URL").map_err(|_| std::io::Error::other(BACKEND_URL_MISSING_MSG))?,
        env::var("BACKEND_API_KEY").unwrap_or_default(),
        Duration::from_secs(secs_from_env("BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT_SECS)),
    );
    let config = ServerConfig::new(
        addr,
        backend,
        Duration::from_secs(secs_from_env("SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS)),
    );

    info!("App is starting in env={}", env);

    server::run(config).await
}

fn secs_from_env(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Display)]
#[non_exhaustive]
enum Env {
    Dev,
    Stg,
    Prod,
}

impl FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "stg" => Ok(Self::Stg),
            "prod" => Ok(Self::Prod),
            s => Err(format!("Invalid Env: {s}")),
        }
    }
}
