use std::env;

use crate::models::profile::ThemePreference;
use crate::services::badges::TimeOfDayRules;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub extra_origins: Vec<String>,

    pub default_theme: ThemePreference,
    pub time_rules: TimeOfDayRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://perchly.db?mode=rwc".into(),
            host: "127.0.0.1".into(),
            port: 8787,
            frontend_url: "http://localhost:8081".into(),
            extra_origins: Vec::new(),
            default_theme: ThemePreference::Dark,
            time_rules: TimeOfDayRules::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let default_rules = defaults.time_rules;

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),

            default_theme: parse_var("DEFAULT_THEME", defaults.default_theme),
            time_rules: TimeOfDayRules {
                early_before_hour: parse_var("EARLY_BIRD_BEFORE_HOUR", default_rules.early_before_hour)
                    .min(24),
                late_from_hour: parse_var("NIGHT_OWL_FROM_HOUR", default_rules.late_from_hour).min(24),
            },
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_addr(), "127.0.0.1:8787");
        assert_eq!(config.default_theme, ThemePreference::Dark);
        assert_eq!(config.time_rules.early_before_hour, 7);
        assert_eq!(config.time_rules.late_from_hour, 22);
    }

    #[test]
    fn test_parse_var_falls_back() {
        assert_eq!(parse_var("PERCHLY_TEST_UNSET_VARIABLE", 42u16), 42);
    }
}
