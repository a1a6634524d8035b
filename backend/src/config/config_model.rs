#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub jwt: JwtSecret,
    pub stripe: Stripe,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtSecret {
    pub secret: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Stripe {
    pub secret_key: String,
    pub currency: String,
}
