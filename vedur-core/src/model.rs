use serde::{Deserialize, Serialize};

use crate::catalog::Descriptions;
use crate::error::VedurError;

/// Flattened forecast, observation or text record.
pub type Record = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Is,
    En,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Is => "is",
            Lang::En => "en",
        }
    }

    pub const fn all() -> &'static [Lang] {
        &[Lang::Is, Lang::En]
    }

    /// Resolve an optional caller value; absent or empty means Icelandic.
    pub fn resolve(value: Option<&str>) -> Result<Self, VedurError> {
        match value {
            None | Some("") => Ok(Lang::default()),
            Some(s) => Lang::try_from(s),
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Lang {
    type Error = VedurError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "is" => Ok(Lang::Is),
            "en" => Ok(Lang::En),
            _ => Err(VedurError::InvalidLanguage(value.to_string())),
        }
    }
}

impl std::str::FromStr for Lang {
    type Err = VedurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::try_from(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ForecastOptions {
    pub lang: Option<String>,
    /// Comma or semicolon separated station ids.
    pub stations: Option<String>,
    pub descriptions: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ObservationOptions {
    pub lang: Option<String>,
    /// Comma or semicolon separated station ids.
    pub stations: Option<String>,
    pub descriptions: bool,
    /// Passed through as `time=`, e.g. `1h` or `3h`.
    pub time: Option<String>,
    /// Passed through as `anytime=`, e.g. `0` or `1`.
    pub anytime: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub lang: Option<String>,
    /// Comma or semicolon separated bulletin ids, see [`crate::catalog::TEXT_TYPES`].
    pub types: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub id: String,
}

/// Uniform response wrapper returned by every operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub results: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Descriptions>,
}

impl<T> Envelope<T> {
    pub fn new(results: Vec<T>) -> Self {
        Self { results, descriptions: None }
    }

    pub fn with_descriptions(mut self, descriptions: Option<Descriptions>) -> Self {
        self.descriptions = descriptions;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub info: &'static str,
    pub operations: Vec<OperationInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationInfo {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}
