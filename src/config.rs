use crate::models::AppConfig;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Arc<AppConfig>, String> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    let config = parse_config(&contents)?;

    info!(
        "Configuration loaded: session timeout {}s, landing '{}', login '{}'",
        config.session.timeout_secs, config.routes.landing, config.routes.login
    );

    Ok(Arc::new(config))
}

/// Parse and validate YAML configuration
pub fn parse_config(contents: &str) -> Result<AppConfig, String> {
    let config: AppConfig = serde_yaml::from_str(contents)
        .map_err(|e| format!("Failed to parse YAML config: {}", e))?;

    config.validate()?;

    Ok(config)
}

/// Load configuration from `CONFIG_PATH` or the usual file names.
///
/// Without any file the built-in defaults apply; a file that exists but
/// does not load is an error.
pub fn load_config_with_fallback() -> Result<Arc<AppConfig>, String> {
    if let Ok(config_path) = std::env::var("CONFIG_PATH") {
        return load_config(&config_path)
            .map_err(|e| format!("Failed to load config from CONFIG_PATH: {}", e));
    }

    for path in ["config.yaml", "config.yml"] {
        if Path::new(path).exists() {
            return load_config(path);
        }
    }

    warn!("No configuration file found, using defaults");
    Ok(Arc::new(AppConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoutePaths, SessionSettings};

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
session:
  timeout_secs: 600
  storage_key_prefix: "portal"
routes:
  landing: "/welcome"
  login: "/signin"
  dashboard: "/me"
  doctor_dashboard: "/clinic"
"#;

        let config = parse_config(yaml).unwrap();
        assert_eq!(config.session.timeout_secs, 600);
        assert_eq!(config.session.storage_key_prefix, "portal");
        assert_eq!(config.routes.login, "/signin");
        assert_eq!(config.routes.doctor_dashboard, "/clinic");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("session:\n  timeout_secs: 120\n").unwrap();
        assert_eq!(config.session.timeout_secs, 120);
        assert_eq!(config.session.storage_key_prefix, "nexora");
        assert_eq!(config.routes, RoutePaths::default());

        let config = parse_config("{}").unwrap();
        assert_eq!(config.session.timeout_secs, 900);
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let result = parse_config("session:\n  timeout_secs: 0\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("timeout_secs"));
    }

    #[test]
    fn test_config_validation_oversized_timeout() {
        let result = parse_config("session:\n  timeout_secs: 18446744073709551615\n");
        assert!(result.unwrap_err().contains("at most 86400"));

        let result = parse_config("session:\n  timeout_secs: 86401\n");
        assert!(result.is_err());

        let config = parse_config("session:\n  timeout_secs: 86400\n").unwrap();
        assert_eq!(config.session.timeout_secs, 86400);
    }

    #[test]
    fn test_config_validation_relative_path() {
        let config = AppConfig {
            session: SessionSettings::default(),
            routes: RoutePaths {
                login: "login".to_string(),
                ..RoutePaths::default()
            },
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("routes.login"));
    }

    #[test]
    fn test_config_validation_empty_prefix() {
        let result = parse_config("session:\n  storage_key_prefix: \"  \"\n");
        assert!(result.unwrap_err().contains("storage_key_prefix"));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = parse_config("session: [1, 2");
        assert!(result.unwrap_err().starts_with("Failed to parse YAML config"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/nexora-config.yaml");
        assert!(result.unwrap_err().contains("Failed to read config file"));
    }
}
