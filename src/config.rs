use std::net::{IpAddr, SocketAddr};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub jwt_secret: String,
    pub jwt_access_expiration_secs: u64,
    pub jwt_refresh_expiration_secs: u64,
    pub frontend_url: String,
    pub verification: VerificationSettings,
    pub admin_seed: Option<AdminSeed>,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Longest accepted verification code lifetime: one day.
pub const MAX_CODE_TTL_SECS: u64 = 86_400;

/// Lifetime and retry budget of one-time verification codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationSettings {
    pub code_ttl_secs: u64,
    pub max_attempts: i32,
}

impl VerificationSettings {
    /// Reject lifetimes outside `1..=MAX_CODE_TTL_SECS` and an empty attempt budget.
    ///
    /// # Errors
    ///
    /// Names the offending variable.
    pub fn check(&self) -> anyhow::Result<()> {
        if self.code_ttl_secs == 0 || self.code_ttl_secs > MAX_CODE_TTL_SECS {
            return Err(anyhow::anyhow!(
                "VERIFICATION_CODE_TTL_SECS must be between 1 and {MAX_CODE_TTL_SECS}"
            ));
        }
        if self.max_attempts < 1 {
            return Err(anyhow::anyhow!("VERIFICATION_MAX_ATTEMPTS must be at least 1"));
        }
        Ok(())
    }
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            code_ttl_secs: 900,
            max_attempts: 5,
        }
    }
}

/// Superuser created at startup when all three variables are set.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `DATABASE_URL`, `JWT_SECRET`
    /// Optional with defaults: `SERVER_HOST`, `SERVER_PORT`, `ENVIRONMENT`, `LOG_LEVEL`,
    /// `JWT_ACCESS_EXPIRATION_SECS`, `JWT_REFRESH_EXPIRATION_SECS`, `FRONTEND_URL`,
    /// `VERIFICATION_CODE_TTL_SECS`, `VERIFICATION_MAX_ATTEMPTS`
    /// Optional: `ADMIN_USERNAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD`
    ///
    /// `PORT` overrides `SERVER_PORT`, and in production the host defaults to `0.0.0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric / address value
    /// cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let environment = match std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let server_port = std::env::var("PORT")
            .or_else(|_| std::env::var("SERVER_PORT"))
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = std::env::var("SERVER_HOST")
            .unwrap_or_else(|_| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let jwt_access_expiration_secs = parse_env("JWT_ACCESS_EXPIRATION_SECS", 900)?;
        let jwt_refresh_expiration_secs = parse_env("JWT_REFRESH_EXPIRATION_SECS", 604_800)?;

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());

        let defaults = VerificationSettings::default();
        let verification = VerificationSettings {
            code_ttl_secs: parse_env("VERIFICATION_CODE_TTL_SECS", defaults.code_ttl_secs)?,
            max_attempts: parse_env("VERIFICATION_MAX_ATTEMPTS", defaults.max_attempts)?,
        };
        verification.check()?;

        let admin_seed = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(email), Ok(password)) => Some(AdminSeed {
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            server_host,
            server_port,
            environment,
            log_level,
            jwt_secret,
            jwt_access_expiration_secs,
            jwt_refresh_expiration_secs,
            frontend_url,
            verification,
            admin_seed,
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}

/// Read an optional numeric variable, falling back to `default` when unset.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{name} must be a valid number")),
        Err(_) => Ok(default),
    }
}
