use crate::error::{AppError, Result};
use crate::models::{clamp_contrast, DEFAULT_CONTRAST};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Threshold used when a URL does not carry one.
    pub default_contrast: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            default_contrast: DEFAULT_CONTRAST,
        }
    }
}

impl Config {
    /// Read `BIND_ADDR`, `PORT` and `DEFAULT_CONTRAST` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("BIND_ADDR={}", raw)))?,
            None => defaults.bind_addr,
        };
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("PORT={}", raw)))?,
            None => defaults.port,
        };
        let default_contrast = match lookup("DEFAULT_CONTRAST") {
            Some(raw) => {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Config(format!("DEFAULT_CONTRAST={}", raw)))?;
                clamp_contrast(value, DEFAULT_CONTRAST)
            }
            None => defaults.default_contrast,
        };

        Ok(Self {
            bind_addr,
            port,
            default_contrast,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1"),
            ("PORT", "3000"),
            ("DEFAULT_CONTRAST", "4.5"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.default_contrast, 4.5);
    }

    #[test]
    fn test_contrast_is_clamped() {
        let config = Config::from_lookup(lookup(&[("DEFAULT_CONTRAST", "0")])).unwrap();
        assert_eq!(config.default_contrast, 1.0);
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("DEFAULT_CONTRAST", "high")])),
            Err(AppError::Config(_))
        ));
    }
}
