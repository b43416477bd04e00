use std::{env, net::{SocketAddr, ToSocketAddrs as _}};

use sea_orm::ConnectOptions;
use thiserror::Error;
use tracing::info;

const DEFAULT_HOST_ADDRESS: &str = "127.0.0.1:8080";

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment `{0}` is required to be set")]
    Missing(&'static str),
    #[error("`HOST_ADDRESS` is not in a valid format")]
    InvalidHost(#[from] std::io::Error),
    #[error("unable to resolve host from `HOST_ADDRESS`")]
    UnresolvedHost,
}

/// Reads the server configuration from the environment (and `.env`, once loaded)
pub fn load() -> Result<Config, ConfigError> {
    Ok(Config {
        host_address: load_host_address()?,
        database_opt: load_database_opt()?,
        jwt_key: load_jwt_key()?,
    })
}

fn load_host_address() -> Result<SocketAddr, ConfigError> {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| DEFAULT_HOST_ADDRESS.to_string());

    var.to_socket_addrs()?
        .next()
        .ok_or(ConfigError::UnresolvedHost)
}

fn load_database_opt() -> Result<ConnectOptions, ConfigError> {
    info!("Loading environment `DATABASE_URL`");

    let url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

    Ok(ConnectOptions::new(url))
}

fn load_jwt_key() -> Result<String, ConfigError> {
    info!("Loading environment `JWT_SECRET`");

    match env::var("JWT_SECRET") {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(ConfigError::Missing("JWT_SECRET")),
    }
}
