use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LadderError {
    #[error("unknown side: {0} (expected \"asks\" or \"bids\")")]
    UnknownSide(String),
}

pub type Result<T> = std::result::Result<T, LadderError>;
