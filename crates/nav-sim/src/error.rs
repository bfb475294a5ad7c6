use nav_core::NavError;
use nav_mobility::MobilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] NavError),

    #[error(transparent)]
    Mobility(#[from] MobilityError),

    #[error("no tokio runtime: build the location manager from inside a runtime")]
    NoRuntime,

    #[error("location manager has shut down")]
    Closed,
}

pub type SimResult<T> = Result<T, SimError>;
