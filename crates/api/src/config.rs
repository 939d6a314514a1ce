use generate::ProviderConfig;

/// Process-wide configuration, read once at startup and handed to the
/// components that need it. No hot reload.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub mongo_uri: String,
    pub secret_key: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Self {
            provider: ProviderConfig {
                api_key,
                ..ProviderConfig::default()
            },
            mongo_uri: std::env::var("MONGO_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017/".to_string()),
            secret_key: std::env::var("SECRET_KEY")
                .unwrap_or_else(|_| "your_default_secret_key".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }
}
