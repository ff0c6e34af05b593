pub mod cli;
pub mod commands;
pub mod errors;
pub mod settings;
pub mod telemetry;
