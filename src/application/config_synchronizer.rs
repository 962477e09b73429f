// Config synchronizer - loads, saves and re-reads the device configuration
use crate::application::config_fields::{bind_document, update_request, ConfigFields};
use crate::application::device_gateway::DeviceGateway;
use crate::domain::command::{CommandRequest, CONFIG_ENDPOINT};
use crate::domain::device_config::{ConfigDocument, PasswordChange};
use crate::domain::error::DashboardError;
use std::sync::Arc;

/// Result of an accepted update. The editing surface closes on this value;
/// `reload` reports the follow-up read separately.
#[derive(Debug)]
pub struct SaveOutcome {
    pub response: String,
    pub reload: Result<ConfigDocument, DashboardError>,
}

#[derive(Clone)]
pub struct ConfigSynchronizer {
    gateway: Arc<dyn DeviceGateway>,
}

impl ConfigSynchronizer {
    pub fn new(gateway: Arc<dyn DeviceGateway>) -> Self {
        Self { gateway }
    }

    pub async fn load<F>(&self, fields: &mut F) -> Result<ConfigDocument, DashboardError>
    where
        F: ConfigFields + ?Sized,
    {
        let body = self
            .gateway
            .send(&CommandRequest::new(CONFIG_ENDPOINT))
            .await?;
        let doc = ConfigDocument::from_json(&body)?;
        if doc.is_empty() {
            tracing::warn!("Device returned no recognised config fields");
        }
        let bound = bind_document(&doc, fields);

        tracing::debug!(keys = doc.len(), bound = bound.len(), "Bound device config");
        Ok(doc)
    }

    /// Send every field as it stands now, then re-read from the device so the
    /// form shows what the device actually accepted.
    pub async fn save<F>(&self, fields: &mut F) -> Result<SaveOutcome, DashboardError>
    where
        F: ConfigFields + ?Sized,
    {
        let request = update_request(&*fields);
        let response = self.gateway.send(&request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Config update failed");
        })?;
        tracing::info!("Device accepted config update");

        let reload = self.load(fields).await;
        if let Err(e) = &reload {
            tracing::warn!(error = %e, "Reload after config update failed");
        }

        Ok(SaveOutcome { response, reload })
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<String, DashboardError> {
        change.validate()?;
        let response = self.gateway.send(&change.request()).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Password change failed");
        })?;
        tracing::info!("Device accepted password change");
        Ok(response)
    }
}
