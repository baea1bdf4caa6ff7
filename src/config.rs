use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Maximum accepted tradebook upload size in bytes.
    pub max_upload_bytes: usize,
    /// Hold-hours threshold separating intraday from swing trades.
    pub swing_hold_hours: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let max_upload_bytes = env_map
            .get("MAX_UPLOAD_BYTES")
            .map(|s| s.as_str())
            .unwrap_or("10485760")
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "MAX_UPLOAD_BYTES".to_string(),
                    "must be a valid usize".to_string(),
                )
            })?;

        let swing_hold_hours = env_map
            .get("SWING_HOLD_HOURS")
            .map(|s| s.as_str())
            .unwrap_or("24")
            .parse::<f64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "SWING_HOLD_HOURS".to_string(),
                    "must be a valid number of hours".to_string(),
                )
            })?;
        if !swing_hold_hours.is_finite() || swing_hold_hours <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "SWING_HOLD_HOURS".to_string(),
                "must be a positive number of hours".to_string(),
            ));
        }

        Ok(Config {
            port,
            max_upload_bytes,
            swing_hold_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.swing_hold_hours, 24.0);
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_max_upload_bytes() {
        let mut env_map = HashMap::new();
        env_map.insert("MAX_UPLOAD_BYTES".to_string(), "-1".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "MAX_UPLOAD_BYTES"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_swing_hold_hours() {
        let mut env_map = HashMap::new();
        env_map.insert("SWING_HOLD_HOURS".to_string(), "0".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SWING_HOLD_HOURS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_overrides() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "9000".to_string());
        env_map.insert("SWING_HOLD_HOURS".to_string(), "12".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.swing_hold_hours, 12.0);
    }
}
