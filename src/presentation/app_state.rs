// Application state for HTTP handlers
use crate::application::command_dispatcher::CommandDispatcher;
use crate::application::config_synchronizer::ConfigSynchronizer;
use crate::application::streaming_service::StreamingDashboardService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: StreamingDashboardService,
    pub config_synchronizer: ConfigSynchronizer,
    pub command_dispatcher: CommandDispatcher,
}
