use anyhow::{Context, Result};

use super::config_model::{BackendServer, Database, DotEnvyConfig, JwtSecret, Stripe};

const DEFAULT_JWT_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} is invalid", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?.parse()?,
        body_limit: required("SERVER_BODY_LIMIT")?.parse()?,
        timeout: required("SERVER_TIMEOUT")?.parse()?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().context("DATABASE_MAX_CONNECTIONS is invalid")?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        },
    };

    let stripe = Stripe {
        secret_key: required("STRIPE_SECRET_KEY")?,
        currency: optional("STRIPE_CURRENCY")
            .map(|currency| currency.to_lowercase())
            .unwrap_or_else(|| "usd".to_string()),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        jwt: get_jwt_secret()?,
        stripe,
    })
}

pub fn get_jwt_secret() -> Result<JwtSecret> {
    dotenvy::dotenv().ok();

    let ttl_seconds = match optional("JWT_TTL_SECONDS") {
        Some(raw) => raw.parse().context("JWT_TTL_SECONDS is invalid")?,
        None => DEFAULT_JWT_TTL_SECONDS,
    };

    Ok(JwtSecret {
        secret: required("JWT_SECRET")?,
        ttl_seconds,
    })
}
