#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The raw search query is shorter than the minimum after trimming.
    #[error("search query too short: {len} characters, need at least {min}")]
    QueryTooShort { len: usize, min: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
