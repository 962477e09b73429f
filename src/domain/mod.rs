// Domain layer - pure data types, no I/O
pub mod chart;
pub mod command;
pub mod dashboard;
pub mod device_config;
pub mod error;
pub mod telemetry;
