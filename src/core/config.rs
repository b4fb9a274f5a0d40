use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub swagger: SwaggerConfig,
    pub regions_api: RegionsApiConfig,
    pub nominatim: NominatimConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Idle time after which an in-memory form session is dropped
    pub form_session_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Backend API serving the administrative hierarchy (provinces, regencies, districts)
#[derive(Debug, Clone)]
pub struct RegionsApiConfig {
    /// Base URL, e.g. `https://api.viralkan.app`
    pub base_url: String,
    /// Bearer token sent with every request (optional)
    pub api_token: Option<String>,
    pub timeout: Duration,
    /// How long fetched lists stay cached. Zero disables the cache.
    pub cache_ttl: Duration,
}

/// Nominatim geocoding service configuration
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent
    pub user_agent: String,
    pub timeout: Duration,
}

/// Tunable parameters of the location matching pipeline
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Replacement synonym table (JSON object `canonical -> [aliases]`)
    pub synonyms_path: Option<PathBuf>,
    pub auto_apply_threshold: f64,
    pub confirm_threshold: f64,
    /// Whether confirm-required results may still be written into the form
    pub apply_on_confirm: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            regions_api: RegionsApiConfig::from_env()?,
            nominatim: NominatimConfig::from_env()?,
            matching: MatchingConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_FORM_SESSION_TTL_SECS: u64 = 3600;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let form_session_ttl_secs = env::var("FORM_SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_FORM_SESSION_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "FORM_SESSION_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            form_session_ttl: Duration::from_secs(form_session_ttl_secs),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Viralkan API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Location reconciliation API for Viralkan".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl RegionsApiConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_CACHE_TTL_SECS: u64 = 3600; // 1 hour

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("REGIONS_API_URL")
            .map_err(|_| "REGIONS_API_URL environment variable is required".to_string())?
            .trim_end_matches('/')
            .to_string();

        let api_token = env::var("REGIONS_API_TOKEN").ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var("REGIONS_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "REGIONS_API_TIMEOUT_SECS must be a valid number".to_string())?;

        let cache_ttl_secs = env::var("REGIONS_CACHE_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "REGIONS_CACHE_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

impl NominatimConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("NOMINATIM_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string())
            .trim_end_matches('/')
            .to_string();

        let user_agent = env::var("NOMINATIM_USER_AGENT")
            .unwrap_or_else(|_| "ViralkanCore/1.0 (road-damage-reporting)".to_string());

        let timeout_secs = env::var("NOMINATIM_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "NOMINATIM_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl MatchingConfig {
    pub const DEFAULT_AUTO_APPLY_THRESHOLD: f64 = 0.9;
    pub const DEFAULT_CONFIRM_THRESHOLD: f64 = 0.7;

    pub fn from_env() -> Result<Self, String> {
        let synonyms_path = env::var("SYNONYMS_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let auto_apply_threshold = env::var("MATCH_AUTO_APPLY_THRESHOLD")
            .unwrap_or_else(|_| Self::DEFAULT_AUTO_APPLY_THRESHOLD.to_string())
            .parse::<f64>()
            .map_err(|_| "MATCH_AUTO_APPLY_THRESHOLD must be a valid number".to_string())?;

        let confirm_threshold = env::var("MATCH_CONFIRM_THRESHOLD")
            .unwrap_or_else(|_| Self::DEFAULT_CONFIRM_THRESHOLD.to_string())
            .parse::<f64>()
            .map_err(|_| "MATCH_CONFIRM_THRESHOLD must be a valid number".to_string())?;

        let apply_on_confirm = env::var("MATCH_APPLY_ON_CONFIRM")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| "MATCH_APPLY_ON_CONFIRM must be true or false".to_string())?;

        let config = Self {
            synonyms_path,
            auto_apply_threshold,
            confirm_threshold,
            apply_on_confirm,
        };
        config.validate()?;

        Ok(config)
    }

    /// Thresholds must satisfy `0 < confirm <= auto_apply <= 1`
    pub fn validate(&self) -> Result<(), String> {
        if !(self.confirm_threshold > 0.0
            && self.confirm_threshold <= self.auto_apply_threshold
            && self.auto_apply_threshold <= 1.0)
        {
            return Err(format!(
                "Invalid match thresholds: confirm={} auto_apply={} (expected 0 < confirm <= auto_apply <= 1)",
                self.confirm_threshold, self.auto_apply_threshold
            ));
        }
        Ok(())
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            synonyms_path: None,
            auto_apply_threshold: Self::DEFAULT_AUTO_APPLY_THRESHOLD,
            confirm_threshold: Self::DEFAULT_CONFIRM_THRESHOLD,
            apply_on_confirm: true,
        }
    }
}
