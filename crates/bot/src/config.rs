/// Bot configuration loaded from environment variables.
///
/// Everything except the database URL and the Discord token has a default
/// suitable for the docker-compose setup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub database_url: String,
    /// Maximum connections in the database pool (default: `10`).
    pub database_max_connections: u32,
    /// Base URL of the Nodestone proxy (default: `http://nodestone:8080`).
    pub lodestone_url: String,
    /// Per-request timeout for Lodestone calls in seconds (default: `30`).
    pub lodestone_timeout_secs: u64,
    pub discord_token: String,
    /// Discord REST base URL (default: `https://discord.com/api/v10`).
    pub discord_api_url: String,
    /// Seconds between scheduled Free Company refreshes (default: 6 hours).
    pub fc_refresh_interval_secs: u64,
}

impl BotConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                        |
    /// |----------------------------|--------------------------------|
    /// | `DATABASE_URL`             | required                       |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                           |
    /// | `LODESTONE_URL`            | `http://nodestone:8080`        |
    /// | `LODESTONE_TIMEOUT_SECS`   | `30`                           |
    /// | `DISCORD_TOKEN`            | required                       |
    /// | `DISCORD_API_URL`          | `https://discord.com/api/v10`  |
    /// | `FC_REFRESH_INTERVAL_SECS` | `21600`                        |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    ///
    /// Panics on missing required values or unparsable numbers, like the
    /// rest of startup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.into());

        let database_url = var("DATABASE_URL").expect("DATABASE_URL must be set");
        let discord_token = var("DISCORD_TOKEN").expect("DISCORD_TOKEN must be set");

        let database_max_connections: u32 = get("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        let lodestone_timeout_secs: u64 = get("LODESTONE_TIMEOUT_SECS", "30")
            .parse()
            .expect("LODESTONE_TIMEOUT_SECS must be a valid u64");

        let fc_refresh_interval_secs: u64 = get("FC_REFRESH_INTERVAL_SECS", "21600")
            .parse()
            .expect("FC_REFRESH_INTERVAL_SECS must be a valid u64");

        Self {
            database_url,
            database_max_connections,
            lodestone_url: get("LODESTONE_URL", "http://nodestone:8080"),
            lodestone_timeout_secs,
            discord_token,
            discord_api_url: get("DISCORD_API_URL", "https://discord.com/api/v10"),
            fc_refresh_interval_secs,
        }
    }
}
