//! # Cost Configuration
//!
//! Rates and constants used by the calculation engine: volumetric divisor, payment
//! gateway fee, customs rates (country defaults and HSN prefixes), the sales-tax route
//! table, destination VAT/GST, currency rates and the keywords used for offline weight
//! estimates.
//!
//! Search order:
//! 1. the file named by `LANDED_COST_CONFIG`, when set (a missing file is an error);
//! 2. `landed-cost.toml` in the working directory;
//! 3. the default embedded in the binary.
//!
//! Country and currency keys are matched case-insensitively.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "LANDED_COST_CONFIG";
pub const CONFIG_FILE: &str = "landed-cost.toml";

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[weight]
volumetric_divisor = 5000.0

[gateway]
percentage = 2.9
fixed_fee = 0.30

[customs]
default_rate = 10.0

[customs.countries]
IN = 10.0
GB = 4.0
AE = 5.0
AU = 5.0
CA = 6.5

[customs.hsn]
"64" = 25.0
"6403" = 35.0
"84" = 7.5
"8471" = 10.0
"8517" = 20.0
"8518" = 15.0

[[sales_tax]]
origin = "US"
destination = "IN"
rate = 8.88

[destination_tax]
IN = 18.0
GB = 20.0
AE = 5.0
AU = 10.0
CA = 5.0

[currency]
base = "USD"

[currency.rates]
USD = 1.0
INR = 83.25
EUR = 0.92
GBP = 0.79
AED = 3.6725

[[weight_estimates]]
keyword = "macbook"
weight_kg = 1.3
confidence = 0.9

[[weight_estimates]]
keyword = "laptop"
weight_kg = 2.0
confidence = 0.8

[[weight_estimates]]
keyword = "headphone"
weight_kg = 0.4
confidence = 0.7

[[weight_estimates]]
keyword = "phone"
weight_kg = 0.35
confidence = 0.75

[[weight_estimates]]
keyword = "shoe"
weight_kg = 1.0
confidence = 0.6

[[weight_estimates]]
keyword = "book"
weight_kg = 0.5
confidence = 0.5
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostConfig {
    pub weight: WeightConfig,
    pub gateway: GatewayConfig,
    pub customs: CustomsConfig,
    #[serde(default)]
    pub sales_tax: Vec<SalesTaxRoute>,
    /// VAT/GST percent by destination country.
    #[serde(default)]
    pub destination_tax: BTreeMap<String, f64>,
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub weight_estimates: Vec<WeightKeyword>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightConfig {
    /// cm³ per kilogram of volumetric weight.
    pub volumetric_divisor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub percentage: f64,
    pub fixed_fee: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomsConfig {
    /// Used when the destination has no entry in `countries`.
    pub default_rate: f64,
    #[serde(default)]
    pub countries: BTreeMap<String, f64>,
    /// Rate by HSN prefix; the longest matching prefix wins.
    #[serde(default)]
    pub hsn: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesTaxRoute {
    pub origin: String,
    pub destination: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub base: String,
    /// Units of each currency per one unit of `base`.
    pub rates: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightKeyword {
    pub keyword: String,
    pub weight_kg: f64,
    /// 0.0 to 1.0.
    pub confidence: f64,
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

fn check_rate(key: &str, rate: f64) -> Result<(), ConfigError> {
    if rate.is_finite() && (0.0..=100.0).contains(&rate) {
        Ok(())
    } else {
        Err(invalid(format!("{key} must be between 0 and 100, got {rate}")))
    }
}

fn upper_keys(map: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    map.into_iter()
        .map(|(key, value)| (key.trim().to_ascii_uppercase(), value))
        .collect()
}

/// HSN codes are compared on their digits only, so `8471.30` matches prefix `8471`.
fn hsn_digits(code: &str) -> String {
    code.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

impl CostConfig {
    /// The configuration compiled into the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Parses, normalizes and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: CostConfig = toml::from_str(contents)?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    fn normalized(mut self) -> Self {
        self.customs.countries = upper_keys(self.customs.countries);
        self.customs.hsn = self
            .customs
            .hsn
            .into_iter()
            .map(|(prefix, rate)| (hsn_digits(&prefix), rate))
            .collect();
        self.destination_tax = upper_keys(self.destination_tax);
        self.currency.base = self.currency.base.trim().to_ascii_uppercase();
        self.currency.rates = upper_keys(self.currency.rates);
        for route in &mut self.sales_tax {
            route.origin = route.origin.trim().to_ascii_uppercase();
            route.destination = route.destination.trim().to_ascii_uppercase();
        }
        for estimate in &mut self.weight_estimates {
            estimate.keyword = estimate.keyword.trim().to_lowercase();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let divisor = self.weight.volumetric_divisor;
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(invalid(format!(
                "weight.volumetric_divisor must be greater than zero, got {divisor}"
            )));
        }
        check_rate("gateway.percentage", self.gateway.percentage)?;
        if !self.gateway.fixed_fee.is_finite() || self.gateway.fixed_fee < 0.0 {
            return Err(invalid(format!(
                "gateway.fixed_fee must be zero or more, got {}",
                self.gateway.fixed_fee
            )));
        }
        check_rate("customs.default_rate", self.customs.default_rate)?;
        for (country, rate) in &self.customs.countries {
            check_rate(&format!("customs.countries.{country}"), *rate)?;
        }
        for (prefix, rate) in &self.customs.hsn {
            if prefix.is_empty() {
                return Err(invalid("customs.hsn has an empty prefix".to_string()));
            }
            check_rate(&format!("customs.hsn.{prefix}"), *rate)?;
        }
        for route in &self.sales_tax {
            check_rate(
                &format!("sales_tax {}→{}", route.origin, route.destination),
                route.rate,
            )?;
        }
        for (country, rate) in &self.destination_tax {
            check_rate(&format!("destination_tax.{country}"), *rate)?;
        }
        if !self.currency.rates.contains_key(&self.currency.base) {
            return Err(invalid(format!(
                "currency.rates has no entry for base currency {}",
                self.currency.base
            )));
        }
        for (code, rate) in &self.currency.rates {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(invalid(format!(
                    "currency.rates.{code} must be greater than zero, got {rate}"
                )));
            }
        }
        for estimate in &self.weight_estimates {
            if estimate.keyword.is_empty() {
                return Err(invalid("weight_estimates has an empty keyword".to_string()));
            }
            if !estimate.weight_kg.is_finite() || estimate.weight_kg <= 0.0 {
                return Err(invalid(format!(
                    "weight estimate '{}' must weigh more than zero",
                    estimate.keyword
                )));
            }
            if !(0.0..=1.0).contains(&estimate.confidence) {
                return Err(invalid(format!(
                    "weight estimate '{}' confidence must be between 0 and 1",
                    estimate.keyword
                )));
            }
        }
        Ok(())
    }

    /// Longest configured prefix of `code`, with its rate.
    pub fn hsn_rate(&self, code: &str) -> Option<(&str, f64)> {
        let digits = hsn_digits(code);
        self.customs
            .hsn
            .iter()
            .filter(|(prefix, _)| digits.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, rate)| (prefix.as_str(), *rate))
    }

    /// Customs default for a destination country.
    pub fn country_customs_rate(&self, country: &str) -> f64 {
        self.customs
            .countries
            .get(&country.trim().to_ascii_uppercase())
            .copied()
            .unwrap_or(self.customs.default_rate)
    }

    /// Sales tax percent for a route; 0 when the route is not in the table.
    pub fn sales_tax_rate(&self, origin: &str, destination: &str) -> f64 {
        self.sales_tax
            .iter()
            .find(|route| {
                route.origin.eq_ignore_ascii_case(origin.trim())
                    && route.destination.eq_ignore_ascii_case(destination.trim())
            })
            .map(|route| route.rate)
            .unwrap_or(0.0)
    }

    /// VAT/GST percent at the destination; 0 when not configured.
    pub fn destination_tax_rate(&self, country: &str) -> f64 {
        self.destination_tax
            .get(&country.trim().to_ascii_uppercase())
            .copied()
            .unwrap_or(0.0)
    }

    /// Units of `to` per unit of `from`, when both currencies are configured.
    pub fn exchange_rate(&self, from: &str, to: &str) -> Option<f64> {
        let rates = &self.currency.rates;
        let from_rate = rates.get(&from.trim().to_ascii_uppercase())?;
        let to_rate = rates.get(&to.trim().to_ascii_uppercase())?;
        Some(to_rate / from_rate)
    }
}

/// Reads and validates a configuration file.
pub fn load_from_path(path: &Path) -> Result<CostConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    CostConfig::from_toml_str(&contents)
}

/// Loads configuration following the search order in the module docs.
pub fn load_config() -> Result<CostConfig, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        tracing::info!("Loading config from {} (set by {})", path, CONFIG_ENV);
        return load_from_path(Path::new(&path));
    }

    let local = Path::new(CONFIG_FILE);
    if local.exists() {
        tracing::info!("Loading config from: {}", local.display());
        return load_from_path(local);
    }

    tracing::info!("Using default embedded configuration");
    CostConfig::embedded()
}
