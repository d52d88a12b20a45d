//! Loading parameter structs from TOML
//!
//! Parameter structs in this workspace derive `Deserialize` with `#[serde(default)]`,
//! so a configuration only needs to list the values that differ from the defaults.

use crate::errors::{ClimodError, ClimodResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse a parameter struct from a TOML document
///
/// # Examples
///
/// ```rust
/// use climod_core::config::from_toml_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Parameters {
///     death_rate: f64,
/// }
///
/// let parameters: Parameters = from_toml_str("death_rate = 0.3").unwrap();
/// assert_eq!(parameters.death_rate, 0.3);
/// ```
pub fn from_toml_str<T: DeserializeOwned>(contents: &str) -> ClimodResult<T> {
    Ok(toml::from_str(contents)?)
}

/// Render a parameter struct as a TOML document
pub fn to_toml_string<T: Serialize>(value: &T) -> ClimodResult<String> {
    toml::to_string(value).map_err(|e| ClimodError::Error(e.to_string()))
}
