use thiserror::Error;

use warden_core::CoreError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store unavailable: {0}")]
    Unavailable(#[from] redis::RedisError),

    #[error("core error: {0}")]
    Core(CoreError),
}

impl From<CoreError> for StoreError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidArgument(msg) => StoreError::InvalidArgument(msg),
            other => StoreError::Core(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
