use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid tick_dt: {0} (must be > 0 and finite)")]
    InvalidTickDt(f64),

    #[error("Invalid pool_capacity: {0} (must be > 0)")]
    InvalidPoolCapacity(usize),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
