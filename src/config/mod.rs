/// Database configuration and connection management
pub mod database;

/// Shop settings and catalog seed loading from config.toml
pub mod settings;
