use thiserror::Error;

pub type FunnelResult<T> = Result<T, FunnelError>;

#[derive(Debug, Error)]
pub enum FunnelError {
    #[error("invalid scene size: width={width}, height={height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("invalid time step: {0} ms")]
    InvalidTimeStep(f64),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
