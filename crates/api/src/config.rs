use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Generation engine tuning.
    pub generation: GenerationConfig,
    /// Key for the generative-AI client. Unset runs it offline.
    pub gemini_api_key: Option<String>,
}

/// Mock generation settings.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Probability that a simulated shot render fails (default: `0.2`).
    pub failure_rate: f64,
    /// Multiplier applied to every mock delay (default: `1.0`).
    pub time_scale: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            failure_rate: vidu_pipeline::outcome::DEFAULT_FAILURE_RATE,
            time_scale: 1.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `GENERATION_FAILURE_RATE` | `0.2`                      |
    /// | `GENERATION_TIME_SCALE`   | `1.0`                      |
    /// | `GEMINI_API_KEY`          | unset                      |
    ///
    /// See [`JwtConfig::from_env`] for the JWT variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let failure_rate: f64 = std::env::var("GENERATION_FAILURE_RATE")
            .unwrap_or_else(|_| "0.2".into())
            .parse()
            .expect("GENERATION_FAILURE_RATE must be a number");
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "GENERATION_FAILURE_RATE must be between 0.0 and 1.0"
        );

        let time_scale: f64 = std::env::var("GENERATION_TIME_SCALE")
            .unwrap_or_else(|_| "1.0".into())
            .parse()
            .expect("GENERATION_TIME_SCALE must be a number");
        assert!(time_scale >= 0.0, "GENERATION_TIME_SCALE must not be negative");

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            generation: GenerationConfig {
                failure_rate,
                time_scale,
            },
            gemini_api_key,
        }
    }
}
