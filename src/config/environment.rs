//! Deployment environment selection

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Deployment environment. Each one has an optional overlay file
/// `config/{name}.toml` layered over `default.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

/// Accepted spellings for each environment.
const ALIASES: &[(Environment, &[&str])] = &[
    (Environment::Development, &["development", "dev"]),
    (Environment::Test, &["test"]),
    (Environment::Staging, &["staging", "stage"]),
    (Environment::Production, &["production", "prod"]),
];

impl Environment {
    pub const ENV_VAR: &'static str = "SCHEDULER_APP_ENV";

    /// Read `SCHEDULER_APP_ENV`, defaulting to development when it is unset,
    /// blank or unrecognized.
    pub fn from_env() -> Self {
        std::env::var(Self::ENV_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Name of the overlay file for this environment.
    pub fn overlay_file(&self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALIASES
            .iter()
            .find(|(_, names)| names.iter().any(|name| *name == wanted))
            .map(|(env, _)| *env)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_parses_to_its_environment() {
        for (env, names) in ALIASES {
            for name in *names {
                assert_eq!(name.parse::<Environment>().unwrap(), *env, "alias {}", name);
            }
        }
    }

    #[test]
    fn test_parse_ignores_case_and_padding() {
        assert_eq!(" PROD ".parse::<Environment>().unwrap(), Environment::Production);
    }

    #[test]
    fn test_unknown_environment_keeps_input() {
        match "qa".parse::<Environment>() {
            Err(ConfigError::UnknownEnvironment { value }) => assert_eq!(value, "qa"),
            other => panic!("Expected UnknownEnvironment, got {:?}", other),
        }
    }

    #[test]
    fn test_overlay_file_uses_canonical_name() {
        assert_eq!(Environment::Staging.overlay_file(), "staging.toml");
        assert_eq!("dev".parse::<Environment>().unwrap().overlay_file(), "development.toml");
        assert_eq!(Environment::default(), Environment::Development);
    }
}
