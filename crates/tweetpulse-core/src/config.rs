use crate::app_config::{AppConfig, Credentials, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let credentials = Credentials {
        consumer_key: require("TWITTER_CONSUMER_KEY")?,
        consumer_secret: require("TWITTER_CONSUMER_SECRET")?,
        access_token: require("TWITTER_ACCESS_TOKEN")?,
        access_secret: require("TWITTER_ACCESS_SECRET")?,
    };

    let env = parse_environment(&or_default("TWEETPULSE_ENV", "development"));
    let log_level = or_default("TWEETPULSE_LOG_LEVEL", "info");
    let api_base_url = or_default("TWEETPULSE_API_BASE_URL", "https://api.twitter.com");
    let request_timeout_secs = parse_u64("TWEETPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TWEETPULSE_USER_AGENT", "tweetpulse/0.1 (post-ingestion)");

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        request_timeout_secs,
        user_agent,
        credentials,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("TWITTER_CONSUMER_KEY", "ck");
        m.insert("TWITTER_CONSUMER_SECRET", "cs");
        m.insert("TWITTER_ACCESS_TOKEN", "at");
        m.insert("TWITTER_ACCESS_SECRET", "as");
        m
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_consumer_key() {
        let mut map = full_env();
        map.remove("TWITTER_CONSUMER_KEY");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TWITTER_CONSUMER_KEY"),
            "expected MissingEnvVar(TWITTER_CONSUMER_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_access_secret() {
        let mut map = full_env();
        map.remove("TWITTER_ACCESS_SECRET");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TWITTER_ACCESS_SECRET"),
            "expected MissingEnvVar(TWITTER_ACCESS_SECRET), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_all_required_vars() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.api_base_url, "https://api.twitter.com");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "tweetpulse/0.1 (post-ingestion)");
        assert_eq!(cfg.credentials.consumer_key, "ck");
        assert_eq!(cfg.credentials.access_secret, "as");
    }

    #[test]
    fn build_app_config_timeout_override() {
        let mut map = full_env();
        map.insert("TWEETPULSE_REQUEST_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn build_app_config_timeout_invalid() {
        let mut map = full_env();
        map.insert("TWEETPULSE_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TWEETPULSE_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(TWEETPULSE_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_base_url_override() {
        let mut map = full_env();
        map.insert("TWEETPULSE_API_BASE_URL", "http://127.0.0.1:9009");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:9009");
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{:?}", cfg.credentials);
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("ck"), "consumer key leaked: {rendered}");
        assert!(!rendered.contains("as"), "access secret leaked: {rendered}");
    }
}
