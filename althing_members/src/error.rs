//! Things that can go wrong turning a term page into membership records.

/// Errors from interpreting the content of a term page.
///
/// Only [ExtractionError::UnclassifiedAnnotation] is recoverable; the rest mean the
/// source format has changed and someone needs to look at it.
#[derive(Debug,Clone,Eq,PartialEq,thiserror::Error)]
pub enum ExtractionError {
    #[error("Can't parse a date in `{0}`")]
    UnparseableDate(String),
    #[error("Unrecognised footnote: `{0}`")]
    UnclassifiedAnnotation(String),
    #[error("Unknown party code ({0})")]
    UnknownPartyCode(String),
    #[error("Could not find a table with a `{0}` header")]
    MissingExpectedTable(String),
    #[error("Malformed member row: {0}")]
    MalformedRow(String),
}

impl ExtractionError {
    /// Whether processing can continue, leaving the affected record unchanged.
    pub fn is_recoverable(&self) -> bool {
        matches!(self,ExtractionError::UnclassifiedAnnotation(_))
    }
}
