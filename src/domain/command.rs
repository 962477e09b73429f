// Device requests - every exchange with the device is a parameterised GET
use serde::Serialize;

pub const DATA_LOG_ENDPOINT: &str = "data.csv";
pub const CONFIG_ENDPOINT: &str = "config.json";
pub const SET_CONFIG_ENDPOINT: &str = "setConfig";
pub const MANUAL_WATERING_ENDPOINT: &str = "manualWatering";
pub const REBOOT_ENDPOINT: &str = "reboot";

/// Built fresh for every action. Parameters keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRequest {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl CommandRequest {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }
}

#[cfg(test)]
impl CommandRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One-shot actions authenticated by the device password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCommand {
    ManualWatering,
    Reboot,
}

impl DeviceCommand {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::ManualWatering => MANUAL_WATERING_ENDPOINT,
            Self::Reboot => REBOOT_ENDPOINT,
        }
    }

    pub fn request(self, password: &str) -> CommandRequest {
        CommandRequest::new(self.endpoint()).with_param("password", password)
    }
}
