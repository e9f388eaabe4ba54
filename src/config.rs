//! Configuration, layered with figment: built-in defaults, then
//! `flightview.toml` (or `--config`), then `FLIGHTVIEW_` environment
//! variables. Nested keys use a double underscore in the environment, e.g.
//! `FLIGHTVIEW_PAGINATION__PAGE_SIZE=20`.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::derive::{FilterState, SortOrder, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};
use crate::error::ViewerError;
use crate::fetch::{FetchOptions, DEFAULT_SOURCE};
use crate::state::{ViewerState, DEFAULT_PAGE_SIZE};

const CONFIG_FILE_NAME: &str = "flightview.toml";
const ENV_PREFIX: &str = "FLIGHTVIEW_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub pagination: PaginationConfig,
    pub price: PriceConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path or http(s) URL of the flight document.
    pub location: String,
    pub timeout_secs: u64,
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: usize,
    /// Collapse back to one page when a filter or the ordering changes.
    pub reset_on_change: bool,
}

/// Initial price bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub order: SortOrder,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_SOURCE.to_string(),
            timeout_secs: 30,
            proxy: None,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            reset_on_change: true,
        }
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PRICE,
            max: DEFAULT_MAX_PRICE,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ViewerError> {
        Self::load_from(None)
    }

    /// A missing config file is not an error; defaults apply.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ViewerError> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        if self.pagination.page_size == 0 {
            return Err(ViewerError::Config(
                "pagination.page_size must be greater than 0".into(),
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err(ViewerError::Config(
                "source.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.source.location.trim().is_empty() {
            return Err(ViewerError::Config("source.location is empty".into()));
        }
        Ok(())
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            proxy: self.source.proxy.clone(),
            timeout: self.source.timeout_secs,
        }
    }

    /// Fresh session state seeded with the configured defaults.
    pub fn initial_state(&self) -> ViewerState {
        let filter = FilterState {
            min_price: crate::derive::clamp_price(self.price.min),
            max_price: crate::derive::clamp_price(self.price.max),
            ..FilterState::default()
        };
        ViewerState::new(self.pagination.page_size, self.pagination.reset_on_change)
            .with_filter(filter)
            .with_order(self.display.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_match_viewer_defaults() {
        let config = Config::default();
        assert_eq!(config.source.location, "flights.json");
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.pagination.page_size, 10);
        assert!(config.pagination.reset_on_change);
        assert_eq!(config.price.min, Decimal::ZERO);
        assert_eq!(config.price.max, Decimal::from(1_000_000));
        assert_eq!(config.display.order, SortOrder::PriceAsc);
    }

    #[test]
    fn missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/flightview.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "flightview.toml",
                r#"
                [source]
                location = "data/flights.json"

                [pagination]
                page_size = 5
                reset_on_change = false

                [display]
                order = "duration-asc"
                "#,
            )?;
            jail.set_env("FLIGHTVIEW_PAGINATION__PAGE_SIZE", "7");

            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.source.location, "data/flights.json");
            assert_eq!(config.pagination.page_size, 7);
            assert!(!config.pagination.reset_on_change);
            assert_eq!(config.display.order, SortOrder::DurationAsc);
            Ok(())
        });
    }

    #[test]
    fn zero_page_size_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("flightview.toml", "[pagination]\npage_size = 0\n")?;
            let err = Config::load().expect_err("page_size 0 must be rejected");
            assert!(err.to_string().contains("page_size"));
            Ok(())
        });
    }

    #[test]
    fn initial_state_uses_configured_bounds() {
        let mut config = Config::default();
        config.price.min = Decimal::from(2500);
        config.price.max = Decimal::from(5_000_000);
        config.display.order = SortOrder::PriceDesc;

        let state = config.initial_state();
        assert_eq!(state.filter().min_price, Decimal::from(2500));
        assert_eq!(state.filter().max_price, Decimal::from(1_000_000));
        assert_eq!(state.order(), SortOrder::PriceDesc);
        assert_eq!(state.limit(), 10);
    }
}
