use std::env;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_EVALUATOR_PROGRAM: &str = "squiggle";

/// Process-wide configuration, read once at startup and passed down.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub evaluator_program: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16")]
    InvalidPort,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = env::var("PORT")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        let evaluator_program = env::var("SQUIGGLE_BIN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_EVALUATOR_PROGRAM.to_string());

        Ok(Self {
            host,
            port,
            evaluator_program,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because the process environment is shared between tests.
    #[test]
    fn parses_environment() {
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("SQUIGGLE_BIN");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3000);
        assert_eq!(config.evaluator_program, "squiggle");

        env::set_var("HOST", "0.0.0.0");
        env::set_var("PORT", "8080");
        env::set_var("SQUIGGLE_BIN", "/usr/local/bin/squiggle-eval");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.evaluator_program, "/usr/local/bin/squiggle-eval");

        env::set_var("PORT", "not-a-port");
        let err = Config::from_env().expect_err("expected invalid port error");
        assert!(matches!(err, ConfigError::InvalidPort));

        env::set_var("PORT", "99999");
        let err = Config::from_env().expect_err("expected out of range port error");
        assert!(matches!(err, ConfigError::InvalidPort));

        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("SQUIGGLE_BIN");
    }
}
