// Application layer - dashboard components and the ports they depend on
pub mod chart_builder;
pub mod command_dispatcher;
pub mod config_fields;
pub mod config_synchronizer;
pub mod device_gateway;
pub mod streaming_service;
pub mod timeseries_loader;
