// Editable config fields and their binding to the device document
use crate::domain::command::{CommandRequest, SET_CONFIG_ENDPOINT};
use crate::domain::device_config::{ConfigDocument, ConfigField};
use crate::domain::error::DashboardError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Accessor for the operator-editable inputs, one text value per field.
pub trait ConfigFields: Send {
    fn value(&self, field: ConfigField) -> String;

    fn set_value(&mut self, field: ConfigField, value: String);
}

/// Write every field present in `doc` into `fields`. Absent fields keep
/// whatever they held. Returns the fields that were bound.
pub fn bind_document<F>(doc: &ConfigDocument, fields: &mut F) -> Vec<ConfigField>
where
    F: ConfigFields + ?Sized,
{
    ConfigField::ALL
        .into_iter()
        .filter_map(|field| {
            doc.get(field).map(|value| {
                fields.set_value(field, value.to_string());
                field
            })
        })
        .collect()
}

/// Read all five fields, in wire order, into one `setConfig` request.
/// Values are passed through unchecked; the device validates them.
pub fn update_request<F>(fields: &F) -> CommandRequest
where
    F: ConfigFields + ?Sized,
{
    ConfigField::ALL
        .into_iter()
        .fold(CommandRequest::new(SET_CONFIG_ENDPOINT), |request, field| {
            request.with_param(field.key(), &fields.value(field))
        })
}

/// In-memory form, seeded with the firmware defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigForm {
    values: BTreeMap<ConfigField, String>,
}

impl Default for ConfigForm {
    fn default() -> Self {
        let values = [
            (ConfigField::WateringIntervalsInHours, "24"),
            (ConfigField::WateringDurationInSeconds, "600"),
            (ConfigField::MoistureThreshold, "512"),
            (ConfigField::HistoryStepsInSeconds, "60"),
            (ConfigField::Password, ""),
        ]
        .into_iter()
        .map(|(field, value)| (field, value.to_string()))
        .collect();
        Self { values }
    }
}

impl ConfigForm {
    /// Build the form from submitted inputs keyed by wire name. Every field
    /// must be present: a save sends all five, and a missing one would
    /// otherwise overwrite the device with a value the operator never saw.
    pub fn from_submitted(submitted: HashMap<String, String>) -> Result<Self, DashboardError> {
        let mut values = BTreeMap::new();
        for (key, value) in submitted {
            match ConfigField::from_key(&key) {
                Some(field) => {
                    values.insert(field, value);
                }
                None => tracing::debug!(key = %key, "ignoring unknown form input"),
            }
        }

        let missing: Vec<&str> = ConfigField::ALL
            .into_iter()
            .filter(|field| !values.contains_key(field))
            .map(ConfigField::key)
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::LocalValidationFailed(format!(
                "missing config fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { values })
    }

    pub fn into_values(self) -> BTreeMap<ConfigField, String> {
        self.values
    }
}

impl ConfigFields for ConfigForm {
    fn value(&self, field: ConfigField) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    fn set_value(&mut self, field: ConfigField, value: String) {
        self.values.insert(field, value);
    }
}
