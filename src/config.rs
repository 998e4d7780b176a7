use std::env;

/// Token settings, the only part of the configuration `issue-token` needs
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    // Scheme word expected before the token in the Authorization header
    pub header_prefix: String,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(JwtConfig {
            secret: lookup("JWT_SECRET").ok_or(env::VarError::NotPresent)?,
            header_prefix: lookup("JWT_AUTH_HEADER_PREFIX").unwrap_or_else(|| "JWT".to_string()),
        })
    }
}

/// Configuration settings
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub jwt: JwtConfig,
    pub workers: usize,
}

impl Config {
    /// Loads configuration from environment variables. `.env` is read by
    /// `logging::setup_logging` before this runs.
    pub fn from_env() -> Result<Self, env::VarError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, env::VarError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workers = match lookup("WORKERS") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(env::VarError::NotPresent)?,
            None => num_cpus::get().min(8),
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL").ok_or(env::VarError::NotPresent)?,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            jwt: JwtConfig::from_lookup(&lookup)?,
            workers,
        })
    }
}
