//! Demo configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                  | Default | Meaning                                  |
//! |---------------------------|---------|------------------------------------------|
//! | `INVOICER_DECIMAL_PLACES` | `2`     | Precision of the invoice's line sums     |
//! | `INVOICER_ITEMS_PATH`     | unset   | JSON array of item drafts to load        |
//! | `INVOICER_FILTER`         | `food`  | Comma-separated types for the 2nd table  |
//! | `INVOICER_JSON_PRETTY`    | `false` | Pretty-print the serialized invoice      |

use invoicer_core::{CoreError, DecimalPlaces, ItemTypeFilter};
use std::env;
use std::path::PathBuf;

/// Demo configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Invoice precision
    pub decimal_places: DecimalPlaces,

    /// Item drafts file; the built-in catalog is used when unset
    pub items_path: Option<PathBuf>,

    /// Item types shown in the filtered printout
    pub filter: ItemTypeFilter,

    /// Pretty-print JSON output
    pub json_pretty: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            decimal_places: DecimalPlaces::default(),
            items_path: None,
            filter: ItemTypeFilter::from("food"),
            json_pretty: false,
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let places: i64 = lookup("INVOICER_DECIMAL_PLACES")
            .unwrap_or_else(|| "2".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("INVOICER_DECIMAL_PLACES".to_string()))?;

        let filter = match lookup("INVOICER_FILTER") {
            Some(raw) => parse_filter(&raw)?,
            None => ItemTypeFilter::from("food"),
        };

        let json_pretty = lookup("INVOICER_JSON_PRETTY")
            .unwrap_or_else(|| "false".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("INVOICER_JSON_PRETTY".to_string()))?;

        Ok(DemoConfig {
            decimal_places: DecimalPlaces::try_from(places)?,
            items_path: lookup("INVOICER_ITEMS_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            filter,
            json_pretty,
        })
    }
}

fn parse_filter(raw: &str) -> Result<ItemTypeFilter, ConfigError> {
    let types: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if types.is_empty() {
        return Err(ConfigError::InvalidValue("INVOICER_FILTER".to_string()));
    }
    Ok(ItemTypeFilter::from(types))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Engine(#[from] CoreError),
}
