use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid config: {field} {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Run already finished at tick {tick}")]
    RunFinished { tick: u64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field:  field.into(),
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
