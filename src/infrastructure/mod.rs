// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod device_client;
pub mod http_response;
pub mod plotly_renderer;
