use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderListError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("no snapshot in input")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, OrderListError>;
