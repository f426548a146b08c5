//! Runtime configuration from the environment.
//!
//! `.env` is loaded by the binary before this runs. Markups and the currency
//! rate are not configurable; see `costing::rates`.

use std::env;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Print-view heading and quotation reference prefix.
    pub company: String,
    /// Tax rate applied on documents when a request names none.
    pub document_tax_percentage: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            company: "Rabsin".to_string(),
            document_tax_percentage: 16.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let document_tax_percentage = parse_or(
            &lookup,
            "LANDED_COST_DOCUMENT_TAX",
            defaults.document_tax_percentage,
        )?;
        if !(0.0..=100.0).contains(&document_tax_percentage) {
            return Err(ConfigError::Invalid {
                key: "LANDED_COST_DOCUMENT_TAX",
                value: document_tax_percentage.to_string(),
            });
        }

        Ok(Self {
            host: lookup("LANDED_COST_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "LANDED_COST_PORT", defaults.port)?,
            company: lookup("LANDED_COST_COMPANY")
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(defaults.company),
            document_tax_percentage,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
