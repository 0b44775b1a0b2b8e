#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("malformed placement hints: {0}")]
    MalformedHints(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
