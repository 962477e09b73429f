// Dashboard domain model - what a page load delivers
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::device_config::ConfigField;
use super::error::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Chart,
    Config,
}

/// A rendered figure plus the reason it is degraded, if it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub figure: Value,
    pub notice: Option<Notification>,
}

/// Chunks of the page-load stream, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Chart(ChartPayload),
    Config {
        fields: BTreeMap<ConfigField, String>,
    },
    Failed {
        component: Component,
        notice: Notification,
    },
    Complete {
        components: usize,
        duration_ms: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_message_uses_wire_keys() {
        let mut fields = BTreeMap::new();
        fields.insert(ConfigField::MoistureThreshold, "512".to_string());
        let json = serde_json::to_value(StreamMessage::Config { fields }).unwrap();
        assert_eq!(json["type"], "config");
        assert_eq!(json["fields"]["moisture_threashold"], "512");
    }

    #[test]
    fn test_chart_message_is_tagged() {
        let json = serde_json::to_value(StreamMessage::Chart(ChartPayload {
            figure: serde_json::json!({"data": []}),
            notice: None,
        }))
        .unwrap();
        assert_eq!(json["type"], "chart");
        assert_eq!(json["figure"]["data"], serde_json::json!([]));
    }
}
