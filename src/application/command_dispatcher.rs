// Command dispatcher - single-shot authenticated device actions
use crate::application::device_gateway::DeviceGateway;
use crate::domain::command::DeviceCommand;
use crate::domain::error::DashboardError;
use std::sync::Arc;

/// Each call issues exactly one request with no retry. Two calls issue two
/// commands: delivery is at-least-once from the operator's side.
#[derive(Clone)]
pub struct CommandDispatcher {
    gateway: Arc<dyn DeviceGateway>,
}

impl CommandDispatcher {
    pub fn new(gateway: Arc<dyn DeviceGateway>) -> Self {
        Self { gateway }
    }

    pub async fn manual_watering(&self, password: &str) -> Result<String, DashboardError> {
        self.dispatch(DeviceCommand::ManualWatering, password).await
    }

    pub async fn reboot(&self, password: &str) -> Result<String, DashboardError> {
        self.dispatch(DeviceCommand::Reboot, password).await
    }

    pub async fn dispatch(
        &self,
        command: DeviceCommand,
        password: &str,
    ) -> Result<String, DashboardError> {
        tracing::info!(command = ?command, "Dispatching device command");
        match self.gateway.send(&command.request(password)).await {
            Ok(body) => Ok(body),
            Err(e) => {
                tracing::warn!(command = ?command, error = %e, "Device command failed");
                Err(e)
            }
        }
    }
}
