use nav_core::NavError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error(transparent)]
    Config(#[from] NavError),

    #[error("reroute ignored: new route has {points} point(s), need at least 2")]
    DegenerateReroute { points: usize },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
