// Streaming dashboard service - page load with chart and config fetched concurrently
use crate::application::chart_builder::{ChartBuilder, ChartRenderer};
use crate::application::config_fields::ConfigForm;
use crate::application::config_synchronizer::ConfigSynchronizer;
use crate::application::timeseries_loader::TimeSeriesLoader;
use crate::domain::dashboard::{ChartPayload, Component, StreamMessage};
use crate::domain::error::{DashboardError, ErrorKind, Notification};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const STREAM_BUFFER: usize = 8;

#[derive(Clone)]
pub struct StreamingDashboardService {
    loader: TimeSeriesLoader,
    builder: ChartBuilder,
    renderer: Arc<dyn ChartRenderer<Output = Value>>,
    synchronizer: ConfigSynchronizer,
}

impl StreamingDashboardService {
    pub fn new(
        loader: TimeSeriesLoader,
        builder: ChartBuilder,
        renderer: Arc<dyn ChartRenderer<Output = Value>>,
        synchronizer: ConfigSynchronizer,
    ) -> Self {
        Self {
            loader,
            builder,
            renderer,
            synchronizer,
        }
    }

    /// Load the log and render it. A malformed log renders whatever still
    /// decoded, with a notice; transport failures are returned as errors.
    pub async fn chart(&self) -> Result<ChartPayload, DashboardError> {
        let decoded = self.loader.load().await?;
        let notice = decoded.issue.map(|e| {
            tracing::warn!(error = %e, "Rendering partial chart for malformed log");
            e.notification()
        });

        let figure = self
            .builder
            .render(&decoded.set, Utc::now(), self.renderer.as_ref());
        Ok(ChartPayload { figure, notice })
    }

    /// Fresh form with the device's values bound over the defaults.
    pub async fn config(&self) -> Result<ConfigForm, DashboardError> {
        let mut form = ConfigForm::default();
        self.synchronizer.load(&mut form).await?;
        Ok(form)
    }

    /// Start both page-load paths independently. Each result is sent as soon
    /// as it is ready, followed by a completion message.
    pub fn stream_dashboard(&self) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let start_time = Instant::now();

        let chart_task = {
            let service = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let msg = match service.chart().await {
                    Ok(payload) => StreamMessage::Chart(payload),
                    Err(e) => {
                        tracing::warn!(error = %e, "Chart load failed");
                        StreamMessage::Failed {
                            component: Component::Chart,
                            notice: e.notification(),
                        }
                    }
                };
                let _ = tx.send(msg).await;
            })
        };

        let config_task = {
            let service = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let msg = match service.config().await {
                    Ok(form) => StreamMessage::Config {
                        fields: form.into_values(),
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "Config load failed");
                        StreamMessage::Failed {
                            component: Component::Config,
                            notice: e.notification(),
                        }
                    }
                };
                let _ = tx.send(msg).await;
            })
        };

        tokio::spawn(async move {
            let tasks = [(Component::Chart, chart_task), (Component::Config, config_task)];
            for (component, task) in tasks {
                // A task that died never sent its message; report it here.
                if let Err(e) = task.await {
                    tracing::error!(error = %e, ?component, "Dashboard task aborted");
                    let _ = tx
                        .send(StreamMessage::Failed {
                            component,
                            notice: Notification {
                                kind: ErrorKind::SourceUnavailable,
                                message: format!("{component:?} could not be loaded: {e}"),
                            },
                        })
                        .await;
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as i64;
            tracing::debug!(duration_ms, "Dashboard stream complete");
            let _ = tx
                .send(StreamMessage::Complete {
                    components: 2,
                    duration_ms,
                })
                .await;
        });

        rx
    }
}
