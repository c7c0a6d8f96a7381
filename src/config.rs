use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreAdapter {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub adapter: StoreAdapter,
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub uploads_dir: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let adapter = match std::env::var("STORE_ADAPTER").as_deref() {
            Ok("postgres") => StoreAdapter::Postgres,
            _ => StoreAdapter::Memory,
        };
        let database_url = std::env::var("DATABASE_URL").ok();
        if adapter == StoreAdapter::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required with STORE_ADAPTER=postgres");
        }
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| "secret".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        let uploads_dir = std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into());
        Ok(Self {
            adapter,
            database_url,
            jwt,
            uploads_dir,
        })
    }

    /// Fixed configuration for tests: memory adapter, static secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            adapter: StoreAdapter::Memory,
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 5,
            },
            uploads_dir: "uploads".into(),
        }
    }
}
