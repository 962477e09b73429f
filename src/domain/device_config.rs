// Device configuration domain models
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::command::{CommandRequest, SET_CONFIG_ENDPOINT};
use super::error::DashboardError;

/// Settings the device exposes for editing. The declaration order is the
/// wire order of every update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfigField {
    #[serde(rename = "watering_intervals_in_hours")]
    WateringIntervalsInHours,
    #[serde(rename = "watering_duration_in_seconds")]
    WateringDurationInSeconds,
    // Spelling matches the firmware's key.
    #[serde(rename = "moisture_threashold")]
    MoistureThreshold,
    #[serde(rename = "history_steps_in_seconds")]
    HistoryStepsInSeconds,
    #[serde(rename = "password")]
    Password,
}

impl ConfigField {
    pub const ALL: [ConfigField; 5] = [
        ConfigField::WateringIntervalsInHours,
        ConfigField::WateringDurationInSeconds,
        ConfigField::MoistureThreshold,
        ConfigField::HistoryStepsInSeconds,
        ConfigField::Password,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::WateringIntervalsInHours => "watering_intervals_in_hours",
            Self::WateringDurationInSeconds => "watering_duration_in_seconds",
            Self::MoistureThreshold => "moisture_threashold",
            Self::HistoryStepsInSeconds => "history_steps_in_seconds",
            Self::Password => "password",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The device's view of its settings, as returned by `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigDocument {
    values: BTreeMap<ConfigField, ConfigValue>,
}

impl ConfigDocument {
    /// Keys outside the enumerated set and values that are neither numbers nor
    /// strings are skipped; only a non-object document is an error.
    pub fn from_json(text: &str) -> Result<Self, DashboardError> {
        let object: serde_json::Map<String, Value> = serde_json::from_str(text)
            .map_err(|e| DashboardError::MalformedConfig(e.to_string()))?;

        let mut values = BTreeMap::new();
        for (key, value) in object {
            let Some(field) = ConfigField::from_key(&key) else {
                tracing::debug!(key = %key, "ignoring unknown config key");
                continue;
            };
            match value {
                Value::Number(n) => {
                    values.insert(field, ConfigValue::Number(n));
                }
                Value::String(s) => {
                    values.insert(field, ConfigValue::Text(s));
                }
                other => {
                    tracing::warn!(key = %key, value = %other, "unsupported config value type");
                }
            }
        }

        Ok(Self { values })
    }

    pub fn get(&self, field: ConfigField) -> Option<&ConfigValue> {
        self.values.get(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordChange {
    pub password: String,
    pub new_password: String,
    pub confirmation: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.new_password != self.confirmation {
            return Err(DashboardError::LocalValidationFailed(
                "new passwords do not match".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request(&self) -> CommandRequest {
        CommandRequest::new(SET_CONFIG_ENDPOINT)
            .with_param("password", &self.password)
            .with_param("new_password", &self.new_password)
    }
}
