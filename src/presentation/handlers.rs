// HTTP request handlers
use crate::application::config_fields::ConfigForm;
use crate::domain::device_config::PasswordChange;
use crate::domain::error::{DashboardError, Notification};
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CommandForm {
    pub password: String,
}

/// Success reply for one-shot actions; `closed` tells the page to dismiss
/// the action surface.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub closed: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub closed: bool,
    pub message: String,
    pub config: Option<ConfigForm>,
    pub reload_error: Option<Notification>,
}

fn closed(message: String) -> Json<ActionResponse> {
    Json(ActionResponse {
        closed: true,
        message,
    })
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Rendered history chart
pub async fn get_chart(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let compress = accepts_brotli(&headers);

    match state.dashboard_service.chart().await {
        Ok(payload) => match json_response(&payload, compress).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => e.into_response(),
    }
}

/// Current device configuration, over the firmware defaults
pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConfigForm>, DashboardError> {
    state.dashboard_service.config().await.map(Json)
}

pub async fn save_config(
    State(state): State<Arc<AppState>>,
    Json(submitted): Json<HashMap<String, String>>,
) -> Result<Json<SaveResponse>, DashboardError> {
    let mut form = ConfigForm::from_submitted(submitted)?;
    let outcome = state.config_synchronizer.save(&mut form).await?;

    let (config, reload_error) = match outcome.reload {
        Ok(_) => (Some(form), None),
        Err(e) => (None, Some(e.notification())),
    };

    Ok(Json(SaveResponse {
        closed: true,
        message: outcome.response,
        config,
        reload_error,
    }))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Json(change): Json<PasswordChange>,
) -> Result<Json<ActionResponse>, DashboardError> {
    state
        .config_synchronizer
        .change_password(&change)
        .await
        .map(closed)
}

pub async fn manual_watering(
    State(state): State<Arc<AppState>>,
    Json(form): Json<CommandForm>,
) -> Result<Json<ActionResponse>, DashboardError> {
    state
        .command_dispatcher
        .manual_watering(&form.password)
        .await
        .map(closed)
}

pub async fn reboot(
    State(state): State<Arc<AppState>>,
    Json(form): Json<CommandForm>,
) -> Result<Json<ActionResponse>, DashboardError> {
    state
        .command_dispatcher
        .reboot(&form.password)
        .await
        .map(closed)
}

/// Page-load stream: chart and config arrive as each finishes
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let rx = state.dashboard_service.stream_dashboard();
    stream_from_receiver(rx, compress).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_builder::ChartBuilder;
    use crate::application::command_dispatcher::CommandDispatcher;
    use crate::application::config_synchronizer::ConfigSynchronizer;
    use crate::application::device_gateway::fake::RecordingGateway;
    use crate::application::device_gateway::DeviceGateway;
    use crate::application::streaming_service::StreamingDashboardService;
    use crate::application::timeseries_loader::TimeSeriesLoader;
    use crate::infrastructure::plotly_renderer::PlotlyRenderer;
    use axum::http::StatusCode;

    fn state(gateway: RecordingGateway) -> State<Arc<AppState>> {
        let gateway: Arc<dyn DeviceGateway> = Arc::new(gateway);
        let config_synchronizer = ConfigSynchronizer::new(gateway.clone());
        State(Arc::new(AppState {
            dashboard_service: StreamingDashboardService::new(
                TimeSeriesLoader::new(gateway.clone()),
                ChartBuilder::default(),
                Arc::new(PlotlyRenderer),
                config_synchronizer.clone(),
            ),
            config_synchronizer,
            command_dispatcher: CommandDispatcher::new(gateway),
        }))
    }

    #[tokio::test]
    async fn test_save_config_reports_reloaded_values() {
        let gateway = RecordingGateway::new()
            .ok("setConfig", "Saved")
            .ok("config.json", r#"{"watering_intervals_in_hours": 12}"#);
        let submitted: HashMap<String, String> = [
            ("watering_intervals_in_hours", "48"),
            ("watering_duration_in_seconds", "600"),
            ("moisture_threashold", "512"),
            ("history_steps_in_seconds", "60"),
            ("password", "1234"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let Json(response) = save_config(state(gateway), Json(submitted)).await.unwrap();

        assert!(response.closed);
        assert_eq!(response.message, "Saved");
        let config = serde_json::to_value(response.config.unwrap()).unwrap();
        assert_eq!(config["watering_intervals_in_hours"], "12");
        assert!(response.reload_error.is_none());
    }

    #[tokio::test]
    async fn test_partial_save_is_bad_request_without_device_call() {
        // The gateway has no scripted answers, so any device call would
        // surface as SourceUnavailable instead.
        let mut submitted = HashMap::new();
        submitted.insert("moisture_threashold".to_string(), "450".to_string());

        let err = save_config(state(RecordingGateway::new()), Json(submitted))
            .await
            .unwrap_err();

        assert!(matches!(err, DashboardError::LocalValidationFailed(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_password_mismatch_is_bad_request() {
        let change = PasswordChange {
            password: "1234".to_string(),
            new_password: "a".to_string(),
            confirmation: "b".to_string(),
        };

        let err = change_password(state(RecordingGateway::new()), Json(change))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reboot_closes_surface() {
        let gateway = RecordingGateway::new().ok("reboot", "Rebooting");
        let form = CommandForm {
            password: "1234".to_string(),
        };

        let Json(response) = reboot(state(gateway), Json(form)).await.unwrap();

        assert!(response.closed);
        assert_eq!(response.message, "Rebooting");
    }

    #[tokio::test]
    async fn test_chart_unavailable_is_bad_gateway() {
        let response = get_chart(HeaderMap::new(), state(RecordingGateway::new())).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
