/// Domain-level failures raised before any query reaches the data store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Unrecognisable category: {0}")]
    UnknownCategory(String),

    #[error("No search query")]
    MissingSearchQuery,
}
